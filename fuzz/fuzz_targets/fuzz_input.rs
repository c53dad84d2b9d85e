// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use videosort::config::NamingConfig;
use videosort::inference::InferenceRequest;
use videosort::mapping::{build_mapping, MappingSource};
use videosort::render::{cleanup, render};
use videosort::{classify::classify, InferenceEngine, SceneNameEngine};

#[derive(Arbitrary, Debug)]
struct Input {
    file_name: String,
    template: String,
    force_tv: bool,
}

fuzz_target!(|input: Input| {
    let request = InferenceRequest::filename(&input.file_name).with_languages();
    let attrs = match SceneNameEngine.infer(&request) {
        Ok(attrs) => attrs,
        Err(_) => return,
    };

    let cleaned = cleanup(&input.template);
    assert_eq!(cleanup(&cleaned), cleaned);

    if let Some(kind) = classify(&attrs, input.force_tv) {
        let source = MappingSource {
            dir_name: "download",
            file_name: &input.file_name,
            category: "",
        };
        let mapping = build_mapping(kind, &attrs, &source, &NamingConfig::default());
        let rendered = render(&input.template, &mapping);
        assert!(!rendered.contains("//"));
    }
});
