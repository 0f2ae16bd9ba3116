//! Parsers turning raw ping/traceroute text into latency records
//!
//! Traceroute lines go through a small lexer (`Number`, `Paren`, `Word`)
//! and a single-pass reducer; ping only needs its `time=` tokens.

pub mod lexer;
pub mod ping;
pub mod traceroute;

pub use lexer::{lex_line, parse_latency, Token};
pub use ping::{parse_ping_output, summarize_ping_output};
pub use traceroute::{parse_hop_line, parse_traceroute_output, HopLine};
