//! Template Syntax Reference
//!
//! This module documents the template language accepted by the [`Parser`](crate::Parser)
//! with the default [`ParserSettings`](crate::ParserSettings). Every delimiter below
//! can be replaced through the settings.
//!
//! # Grammar
//!
//! ```text
//! format      = { literal | placeholder }
//! placeholder = "{" selectors [ "," alignment ] [ ":" formatter ] "}"
//! selectors   = [ selector { "." selector } ]
//! selector    = selector-char { selector-char }
//! alignment   = [ "-" ] digit { digit }
//! formatter   = name "(" options ")" [ ":" format ]
//!             | name ":" format
//!             | format
//! ```
//!
//! Selector characters are letters, digits, `_` and any characters added with
//! [`ParserSettings::with_extra_selector_chars`](crate::ParserSettings::with_extra_selector_chars).
//!
//! ## Literal text
//!
//! | Template | Output | Notes |
//! |----------|--------|-------|
//! | `{{` | `{` | disabled when an alternative escape character is set |
//! | `}}` | `}` | only outside nested formats |
//! | `\{`, `\}` | `{`, `}` | with alternative escape `\` or char-literal conversion |
//! | `\n`, `\t`, `\u00A9` | newline, tab, © | with char-literal conversion |
//!
//! Inside a nested format a single `}` always ends the format, so
//! `{a:{b}}}}` is the placeholder `{a:{b}}` followed by an escaped `}`.
//!
//! ## Selectors
//!
//! The first selector is looked up in the innermost scope, then in each enclosing
//! scope; the remaining selectors are looked up in the previous result.
//!
//! | Placeholder | Meaning |
//! |-------------|---------|
//! | `{}` | the current scope itself |
//! | `{0}` | the first argument (at the root scope) |
//! | `{Name}` | member `Name` of the current scope |
//! | `{Address.City}` | member `City` of member `Address` |
//! | `{Items.0}` | first item of an array |
//! | `{Items.Count}` | number of items, members or characters |
//!
//! ## Alignment
//!
//! `{Name,10}` pads to 10 characters on the left, `{Name,-10}` on the right. Text
//! longer than the width is never truncated.
//!
//! ## Formatter name and options
//!
//! A name is only recognized when it is one of the registered formatter names and is
//! followed by `(` or `:`. Otherwise everything after the `:` is the nested format:
//!
//! ```text
//! {Date:yyyy-MM}          nested format "yyyy-MM"
//! {Count:cond:one|many}   formatter "cond", nested format "one|many"
//! {Kind:choose(a|b):A|B}  formatter "choose", options "a|b", nested format "A|B"
//! {Address:City: {City}}  nested format "City: {City}" (no formatter named City)
//! ```
//!
//! Options may contain balanced parentheses; other delimiters are escaped with `\`.
//!
//! ## Sections
//!
//! The built-in list, conditional and choose formatters split their nested format
//! on top-level `|` into sections. A `|` inside a nested placeholder does not
//! split the outer format.
//!
//! ## Errors
//!
//! | Template | Message |
//! |----------|---------|
//! | `{Name` | Unexpected end of input, missing closing brace |
//! | `a}` | Unmatched closing brace |
//! | `{a..b}` | Empty selector |
//! | `{a.}` | Trailing selector operator |
//! | `{a b}` | Invalid character in selector |
//! | `{a,}` | Invalid alignment, expected digits |
//! | `{a,5x}` | Invalid character after alignment |
//! | `{a,99999}` | Alignment out of range |
//! | `{0:c(x}` | Unterminated formatter options |
//!
//! Nesting deeper than [`ParserSettings::max_nesting_depth`](crate::ParserSettings)
//! always fails, whatever the parse error action.
