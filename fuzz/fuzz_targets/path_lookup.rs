#![no_main]
use dotxml::path::{resolve, resolve_mut};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    // First line is the path, the rest is the document
    let (path, xml) = input.split_once('\n').unwrap_or((input, ""));
    let Ok(mut doc) = dotxml::from_xml_str(xml) else {
        return;
    };
    let found = resolve(&doc.root, path).is_some();
    if let Some(element) = resolve_mut(&mut doc.root, path) {
        element.set_text(path);
    }
    assert_eq!(
        resolve(&doc.root, path).and_then(|e| e.text()),
        found.then_some(path)
    );
});
