use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Field delimiter of a delimited text table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// `,`
    #[default]
    Comma,
    /// `\t`
    Tab,
    /// `;`
    Semicolon,
}

impl Delimiter {
    /// The delimiter byte handed to the csv reader/writer
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Semicolon => b';',
        }
    }

    /// Infer the delimiter from a file extension.
    ///
    /// `.tsv`, `.tab` and `.txt` exports are tab-separated; `.csv` is
    /// comma-separated. Any other extension returns `None`.
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "tsv" | "tab" | "txt" => Some(Delimiter::Tab),
            "csv" => Some(Delimiter::Comma),
            _ => None,
        }
    }

    /// Guess the delimiter from the header line by counting candidates.
    ///
    /// Tab when there are more tabs than commas, then semicolon when there
    /// are more semicolons than commas, comma otherwise.
    pub fn sniff(header_line: &str) -> Self {
        let count = |c: char| header_line.chars().filter(|&x| x == c).count();
        let tabs = count('\t');
        let commas = count(',');
        let semicolons = count(';');

        if tabs > commas {
            Delimiter::Tab
        } else if semicolons > commas {
            Delimiter::Semicolon
        } else {
            Delimiter::Comma
        }
    }

    /// Extension first, header sniffing as fallback
    pub fn detect(path: Option<&Path>, content: &str) -> Self {
        path.and_then(Self::from_extension)
            .unwrap_or_else(|| Self::sniff(content.lines().next().unwrap_or_default()))
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Tab => write!(f, "tab"),
            Delimiter::Semicolon => write!(f, "semicolon"),
        }
    }
}
