/// Curated NerdFont icons used by checkpoint output
///
/// Only icons with a concrete use in the drive and command views live here,
/// so every variant maps to something the operator actually sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NerdFont {
    // Status and feedback
    Check,          //
    Cross,          //
    Warning,        //
    Info,           //

    // Storage
    Desktop,        //
    HardDrive,      //
    Bolt,           //
    Database,       //
    Folder,         //
    FolderOpen,     //
    Hand,           //
    Plug,           //
    Refresh,        //
    Link,           //
    Globe,          //

    // Actions and menu
    Plus,           //
    Terminal,       //
    Target,         //
    Lock,           //
    Package,        //
    Chart,          //
    Table,          //
    Star,           //
    ArrowLeft,      //
}

impl NerdFont {
    /// Get the Unicode character for this nerd font icon
    pub const fn unicode(&self) -> char {
        match self {
            Self::Check => '\u{f00c}',          // fa-check
            Self::Cross => '\u{f00d}',          // fa-times
            Self::Warning => '\u{f071}',        // fa-exclamation-triangle
            Self::Info => '\u{f05a}',           // fa-info-circle

            Self::Desktop => '\u{f108}',        // fa-desktop
            Self::HardDrive => '\u{f0a0}',      // fa-hdd
            Self::Bolt => '\u{f0e7}',           // fa-bolt
            Self::Database => '\u{f1c0}',       // fa-database
            Self::Folder => '\u{f07b}',         // fa-folder
            Self::FolderOpen => '\u{f07c}',     // fa-folder-open
            Self::Hand => '\u{f256}',           // fa-hand-paper
            Self::Plug => '\u{f1e6}',           // fa-plug
            Self::Refresh => '\u{f021}',        // fa-refresh
            Self::Link => '\u{f0c1}',           // fa-link
            Self::Globe => '\u{f0ac}',          // fa-globe

            Self::Plus => '\u{f067}',           // fa-plus
            Self::Terminal => '\u{f120}',       // fa-terminal
            Self::Target => '\u{f140}',         // fa-bullseye
            Self::Lock => '\u{f023}',           // fa-lock
            Self::Package => '\u{f187}',        // fa-archive
            Self::Chart => '\u{f080}',          // fa-bar-chart
            Self::Table => '\u{f0ce}',          // fa-table
            Self::Star => '\u{f005}',           // fa-star
            Self::ArrowLeft => '\u{f060}',      // fa-arrow-left
        }
    }
}

impl std::fmt::Display for NerdFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.unicode())
    }
}

impl From<NerdFont> for char {
    fn from(icon: NerdFont) -> Self {
        icon.unicode()
    }
}

impl From<NerdFont> for String {
    fn from(icon: NerdFont) -> Self {
        icon.unicode().to_string()
    }
}
