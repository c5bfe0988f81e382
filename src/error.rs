use thiserror::Error;

#[derive(Error, Debug)]
/// Errors that can be returned
pub enum Error {
    /// A glyph that is not part of the alphabet
    #[error("unrecognized glyph \"{0}\"")]
    UnknownGlyph(String),

    /// A letter distribution name we don't know about
    #[error("unknown letter distribution \"{0}\"")]
    UnknownDistribution(String),

    /// A malformed line in a letter distribution file
    #[error("bad distribution line \"{0}\" (expect glyph,count,value)")]
    BadDistributionLine(String),

    /// Encoding a string that does not fit in a tile sequence
    #[error("string \"{0}\" is too long to encode")]
    EncodeStringTooLong(String),

    /// Attempt to take a tile that is not on the rack
    #[error("tile \"{0}\" not in rack")]
    TileNotInRack(String),

    /// Attempt to remove a tile that is not in the bag
    #[error("tile \"{0}\" not in bag")]
    TileNotInBag(String),

    /// Drawing more tiles than the bag holds
    #[error("tried to draw {wanted} tiles, bag has only {have}")]
    BagEmpty { wanted: usize, have: usize },

    /// Exchanging when the bag is too depleted
    #[error("cannot exchange with fewer than {0} tiles in the bag")]
    CannotExchange(usize),

    /// A coordinate string like "8H" or "H8" that cannot be parsed
    #[error("malformed board coordinates \"{0}\"")]
    BadCoordinates(String),

    /// A placement that violates the rules; the board is left untouched
    #[error("illegal play: {0}")]
    IllegalPlay(String),

    /// Error reading a lexicon file
    #[error("lexicon file \"{path}\" could not be read")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    /// A lexicon file with the wrong magic number
    #[error("bad magic number in lexicon file")]
    BadMagic,

    /// A lexicon file that ends before its declared contents
    #[error("lexicon file is truncated")]
    Truncated,

    /// A lexicon file from a future format
    #[error("unsupported lexicon format version {0}")]
    UnsupportedVersion(u32),

    /// An alphabet too large for the node encoding
    #[error("alphabet with {0} letters does not fit the lexicon format")]
    AlphabetTooLarge(usize),

    /// A lexicon too large for the 24-bit node index
    #[error("lexicon has too many nodes to encode")]
    LexiconTooLarge,

    /// A premium-square layout with a character we don't recognize
    #[error("unknown board layout glyph '{0}'")]
    BadLayoutGlyph(char),

    /// Error parsing a board layout or plaintext board
    #[error("invalid row count {0} (expect {1})")]
    InvalidRowCount(usize, usize),

    /// A board row of the wrong width
    #[error("invalid row length {0} (expect {1})")]
    InvalidRowLength(usize, usize),

    /// Replaying past the end of a game history
    #[error("game has {0} turns; requested turn is out of range")]
    TurnOutOfRange(usize),
}
