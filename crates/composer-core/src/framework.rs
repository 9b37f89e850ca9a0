//! Web frameworks the chat frontend can be generated with

use crate::error::ComposeError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, clap::ValueEnum)]
pub enum Framework {
    #[default]
    #[value(name = "nextjs")]
    NextJs,
    Vite,
}

impl Framework {
    pub const ALL: [Framework; 2] = [Self::NextJs, Self::Vite];

    pub fn id(&self) -> &'static str {
        match self {
            Framework::NextJs => "nextjs",
            Framework::Vite => "vite",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::NextJs => "Next.js",
            Framework::Vite => "Vite (React)",
        }
    }

    /// Source tree relative to the template root
    pub fn source_dir(&self) -> String {
        format!("frameworks/{}", self.id())
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Framework {
    type Err = ComposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nextjs" | "next" | "next.js" => Ok(Self::NextJs),
            "vite" | "react" => Ok(Self::Vite),
            other => Err(ComposeError::UnknownFramework(other.to_string())),
        }
    }
}
