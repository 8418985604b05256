//! Strigil formatter
//!
//! An ordered pipeline of whole-file text transforms: trailing-whitespace
//! trimming, blank-line collapsing, depth-based re-indentation, string-quote
//! normalization, semicolon policy, and the final-newline policy. Every
//! transform re-uses the scanner's region classification so nothing inside
//! a comment, string, template, or regex body is rewritten, and every
//! transform is idempotent: running it on its own output changes nothing.
//!
//! # Usage
//!
//! ```
//! use strigil_fmt::{format, FormatOptions};
//!
//! let options = FormatOptions::default();
//! let formatted = format("const x = \"a\"  \n", &options);
//! assert_eq!(formatted, "const x = 'a'\n");
//! ```

#![warn(missing_docs)]

pub mod indent;
pub mod options;
pub mod quotes;
pub mod semicolons;
pub mod whitespace;

pub use options::{FinalNewline, FormatOptions, IndentStyle, QuoteStyle, SemicolonPolicy};

/// Run the full pipeline over one file.
pub fn format(source: &str, options: &FormatOptions) -> String {
    let mut text = source.to_string();
    if options.trim_trailing_whitespace {
        text = whitespace::trim_trailing(&text);
    }
    text = whitespace::collapse_blank_lines(&text, options.max_blank_lines);
    text = indent::reindent(&text, options);
    text = quotes::normalize_quotes(&text, options.quote_style);
    text = semicolons::apply_semicolon_policy(&text, options.semicolons);
    text = whitespace::apply_final_newline(&text, options.final_newline);
    text
}

/// Whether formatting would change the file ("check mode").
pub fn check(source: &str, options: &FormatOptions) -> bool {
    format(source, options) != source
}
