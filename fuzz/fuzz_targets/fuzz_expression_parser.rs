//! Fuzz target for the expression parser and fact extraction.
//!
//! Goal: parsing and extraction should **never panic** on any input.
//! Broken expressions must come back as a `SyntaxError`.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_expression_parser
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    owner: &'a str,
    member: Option<&'a str>,
    expression: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    if let Ok(parsed) = exprguard_domain::parse(input.expression) {
        let _ = exprguard_domain::extract(&parsed);
    }

    // Record building goes through the same parser and must agree with it.
    let record = exprguard_domain::build(input.owner, input.member, input.expression);
    assert_eq!(
        record.is_valid(),
        exprguard_domain::parse(input.expression).is_ok()
    );
});
