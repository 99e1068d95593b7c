// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Trivial templating engine.

/// Performs named string replacements in `input` based on `values`.
///
/// The `input` string can have `%key%` placeholders in it where `key` must appear in `values` and
/// which will be replaced by its corresponding value.  Raw `%` characters can be escaped via `%%`
/// and nested expansions are not supported.
///
/// The templates are static and authored alongside this code, so an unterminated placeholder or a
/// placeholder with no matching value is a programming error and panics.
pub(crate) fn expand(input: &'static str, values: &[(&'static str, &str)]) -> String {
    let mut output = String::with_capacity(input.len());

    // Segments alternate between literal text and placeholder keys, with an empty key standing
    // for an escaped percent sign.
    let mut segments = input.split('%');
    output.push_str(segments.next().unwrap_or(""));
    while let Some(key) = segments.next() {
        if key.is_empty() {
            output.push('%');
        } else {
            match values.iter().find(|(candidate, _)| *candidate == key) {
                Some((_, value)) => output.push_str(value),
                None => panic!("No value provided for placeholder '{}'", key),
            }
        }

        match segments.next() {
            Some(literal) => output.push_str(literal),
            None => panic!("Unterminated placeholder in template"),
        }
    }
    output
}
