use thiserror::Error;

/// Raised when an item's owner description announces a trade hold in a format
/// we recognize the start of but cannot read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unrecognized trade hold text: {text:?}")]
    UnrecognizedTradeHold { text: String },
}
