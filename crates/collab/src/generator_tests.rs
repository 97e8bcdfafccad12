// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn git_generator_writes_gitignore() {
    let files = GitGenerator.generate(&HashMap::new()).unwrap();
    assert!(files.contains_key(".gitignore"));
    assert!(String::from_utf8(files[".gitignore"].clone())
        .unwrap()
        .contains(".terraform/"));
}

#[test]
fn terraform_generator_defaults_module_name() {
    let files = TerraformGenerator.generate(&HashMap::new()).unwrap();
    let main = String::from_utf8(files["terraform/main.tf"].clone()).unwrap();
    assert!(main.contains("module \"main\""));
}

#[test]
fn terraform_generator_uses_template_supplied_module_name() {
    let mut data = HashMap::new();
    data.insert("terraform.module".to_string(), "network".to_string());
    let files = TerraformGenerator.generate(&data).unwrap();
    let main = String::from_utf8(files["terraform/main.tf"].clone()).unwrap();
    assert!(main.contains("module \"network\""));
    assert!(main.contains("./modules/network"));
}
