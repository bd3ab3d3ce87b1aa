// Compiled-regex cache, shared by the parser modules: each pattern is
// compiled once on first use and reused for every subsequent line.
macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static regex::Regex {
            static R: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
            R.get_or_init(|| regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}
pub(crate) use re;

pub mod detect;
pub mod lines;
pub mod parsers;

pub(crate) mod dates;

pub use detect::{detect, FormatTag};
pub use lines::normalize_lines;
pub use parsers::parse_statement;
