#![no_main]

use libfuzzer_sys::fuzz_target;
use ctestkit_core::{parse_invocations, quote_argument};

fuzz_target!(|args: Vec<String>| {
    let quoted: Vec<String> = args.iter().map(|a| quote_argument(a)).collect();
    let src = format!("add_test(t {})\n", quoted.join(" "));
    let calls = parse_invocations(&src).expect("quoted output must always parse");
    assert_eq!(calls.len(), 1);
    assert_eq!(&calls[0].args[1..], args.as_slice());
});
