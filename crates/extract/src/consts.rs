use regex::Regex;
use scraper::Selector;
use std::sync::LazyLock;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

selector!(SCRIPT_SELECTOR, "script");
// The state is a JSON document wrapped in a JavaScript string literal.
// Greedy capture: interior quotes are backslash-escaped, so the statement's
// closing `");` is the last one on the line.
regex!(STATE_REGEX, r#"window\.INITIAL_STATE\s*=\s*JSON\.parse\("(.+)"\);"#);
regex!(TAG_REGEX, r"</?[a-zA-Z][^>]*>");
