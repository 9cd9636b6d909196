#![no_main]
use dotxml::{XmlConfig, XmlParser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut parser = XmlParser::with_config(data, XmlConfig::default());
    if let Ok(doc) = parser.parse() {
        let output = dotxml::to_xml_string(&doc);
        let reparsed = dotxml::from_xml_str(&output);
        assert_eq!(reparsed.ok(), Some(doc));
    }
});
