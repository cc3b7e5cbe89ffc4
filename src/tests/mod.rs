#[cfg(test)]
mod rendering_tests {
    use serde_json::json;

    use crate::config::{resolve, UserOptions};
    use crate::error::RenderError;
    use crate::parser::ApiNode;
    use crate::renderer::{MockNormalizer, Renderer};
    use crate::render_object_docs;

    fn tree(value: serde_json::Value) -> ApiNode {
        serde_json::from_value(value).unwrap()
    }

    fn options(value: serde_json::Value) -> UserOptions {
        serde_json::from_value(value).unwrap()
    }

    fn small_package() -> ApiNode {
        tree(json!({
            "kind": "module", "name": "pkg", "path": "pkg", "docstring": "Package docs.",
            "members": [
                {"kind": "function", "name": "area", "path": "pkg.area", "docstring": "Compute area.",
                 "parameters": [{"name": "r", "annotation": "float"}], "returns": "float"},
                {"kind": "attribute", "name": "VERSION", "path": "pkg.VERSION", "docstring": "Version.",
                 "annotation": "str", "value": "'1.0'"}
            ]
        }))
    }

    fn nested_package() -> ApiNode {
        tree(json!({
            "kind": "module", "name": "pkg", "path": "pkg", "docstring": "Root.",
            "members": [
                {"kind": "module", "name": "sub", "path": "pkg.sub", "docstring": "Sub.",
                 "members": [
                    {"kind": "class", "name": "Name", "path": "pkg.sub.Name",
                     "docstring": "A name. See [the base][pkg.sub.Base].",
                     "bases": ["pkg.sub.Base", "object"],
                     "members": [
                        {"kind": "function", "name": "__init__", "path": "pkg.sub.Name.__init__",
                         "docstring": "Init.", "parameters": [{"name": "self"}]},
                        {"kind": "function", "name": "_secret", "path": "pkg.sub.Name._secret",
                         "docstring": "Hidden."}
                     ]},
                    {"kind": "class", "name": "Base", "path": "pkg.sub.Base", "docstring": "Base."}
                 ]}
            ]
        }))
    }

    fn renamed_root() -> ApiNode {
        tree(json!({
            "kind": "module", "name": "sub", "path": "pkg.sub", "docstring": "Sub.",
            "members": [
                {"kind": "attribute", "name": "LIMIT", "path": "pkg.sub.LIMIT", "docstring": "Limit.",
                 "annotation": "int", "value": "3"},
                {"kind": "class", "name": "Name", "path": "pkg.sub.Name", "docstring": "A name.",
                 "members": [
                    {"kind": "function", "name": "area", "path": "pkg.sub.Name.area", "docstring": "Area.",
                     "parameters": [{"name": "self"}, {"name": "scale", "annotation": "float", "default": "1.0"}],
                     "returns": "float"}
                 ]},
                {"kind": "module", "name": "inner", "path": "pkg.sub.inner", "docstring": "Inner.",
                 "members": [
                    {"kind": "module", "name": "deeper", "path": "pkg.sub.inner.deeper", "docstring": "Deeper."}
                 ]}
            ]
        }))
    }

    /// Every internal link must point at an anchor emitted in the same document.
    fn assert_links_resolve(output: &str) {
        for link in output.split("](#").skip(1) {
            let target = link.split(')').next().unwrap();
            assert!(
                output.contains(&format!("<a id=\"{}\"></a>", target)),
                "link to #{} has no anchor in:\n{}",
                target,
                output
            );
        }
    }

    #[test]
    fn test_full_document() {
        let output = render_object_docs(&small_package(), &UserOptions::default()).unwrap();
        let expected = "# pkg\n\
            \n\
            <a id=\"pkg\"></a>\n\
            \n\
            Package docs.\n\
            \n\
            **Attributes:**\n\
            \n\
            | Name | Description |\n\
            | --- | --- |\n\
            | [`VERSION`](#pkg-version) | Version. |\n\
            \n\
            ## VERSION\n\
            \n\
            <a id=\"pkg-version\"></a>\n\
            \n\
            ```python\n\
            VERSION: str = '1.0'\n\
            ```\n\
            \n\
            Version.\n\
            \n\
            **Functions:**\n\
            \n\
            | Name | Description |\n\
            | --- | --- |\n\
            | [`area`](#pkg-area) | Compute area. |\n\
            \n\
            ## area\n\
            \n\
            <a id=\"pkg-area\"></a>\n\
            \n\
            ```python\n\
            area(r: float) -> float\n\
            ```\n\
            \n\
            Compute area.\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_heading_levels_follow_depth() {
        let output = render_object_docs(&nested_package(), &options(json!({"heading_level": 2}))).unwrap();
        assert!(output.starts_with("## pkg\n"));
        assert!(output.contains("\n### sub\n"));
        assert!(output.contains("\n#### Base\n"));
        assert!(output.contains("\n#### Name\n"));
        assert!(output.contains("\n##### \\_\\_init\\_\\_\n"));
    }

    #[test]
    fn test_headings_are_clamped_at_six() {
        let output = render_object_docs(&nested_package(), &options(json!({"heading_level": 5}))).unwrap();
        assert!(output.contains("\n###### Name\n"));
        assert!(output.contains("\n###### \\_\\_init\\_\\_\n"));
        assert!(!output.contains("#######"));
    }

    #[test]
    fn test_anchors_are_hyphenated_and_lowercase() {
        let output = render_object_docs(&nested_package(), &UserOptions::default()).unwrap();
        assert!(output.contains("<a id=\"pkg-sub-name\"></a>"));
        assert!(output.contains("(#pkg-sub-name)"));
        assert!(output.contains("<a id=\"pkg-sub-name-__init__\"></a>"));
        assert!(!output.contains("#pkg.sub"));
        assert!(!output.contains("id=\"pkg.sub.Name\""));
        for anchor in output.split("id=\"").skip(1) {
            let id = anchor.split('"').next().unwrap();
            assert_eq!(id, id.to_lowercase());
        }
        for link in output.split("](#").skip(1) {
            let target = link.split(')').next().unwrap();
            assert_eq!(target, target.to_lowercase());
        }
    }

    #[test]
    fn test_bases_and_autorefs_link_inside_tree() {
        let output = render_object_docs(&nested_package(), &UserOptions::default()).unwrap();
        assert!(output.contains("Bases: [`pkg.sub.Base`](#pkg-sub-base), `object`"));
        assert!(output.contains("A name. See [the base](#pkg-sub-base)."));
    }

    #[test]
    fn test_filter_precedence_through_render() {
        let root = tree(json!({
            "kind": "module", "name": "m", "path": "m", "docstring": "M.",
            "members": [
                {"kind": "function", "name": "abc", "path": "m.abc", "docstring": "Kept."},
                {"kind": "function", "name": "axe", "path": "m.axe", "docstring": "Dropped."}
            ]
        }));
        let output = render_object_docs(&root, &options(json!({"filters": ["!^a", "ab"]}))).unwrap();
        assert!(output.contains("## abc"));
        assert!(!output.contains("axe"));
    }

    #[test]
    fn test_source_order_survives_filtering() {
        let root = tree(json!({
            "kind": "module", "name": "m", "path": "m", "docstring": "M.",
            "members": [
                {"kind": "function", "name": "zeta", "path": "m.zeta", "docstring": "Z."},
                {"kind": "function", "name": "_gone", "path": "m._gone", "docstring": "G."},
                {"kind": "function", "name": "alpha", "path": "m.alpha", "docstring": "A."},
                {"kind": "function", "name": "mid", "path": "m.mid", "docstring": "M."}
            ]
        }));
        let output = render_object_docs(&root, &options(json!({"members_order": "source"}))).unwrap();
        let zeta = output.find("## zeta").unwrap();
        let alpha = output.find("## alpha").unwrap();
        let mid = output.find("## mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
        assert!(!output.contains("_gone"));
    }

    #[test]
    fn test_summary_true_equals_all_kinds() {
        let root = nested_package();
        let all = render_object_docs(&root, &options(json!({"summary": true}))).unwrap();
        let each = render_object_docs(
            &root,
            &options(json!({"summary": {
                "attributes": true, "functions": true, "classes": true, "modules": true
            }})),
        )
        .unwrap();
        assert_eq!(all, each);
    }

    #[test]
    fn test_partial_summary_only_for_selected_kinds() {
        let output = render_object_docs(&nested_package(), &options(json!({"summary": {"classes": true}}))).unwrap();
        assert!(output.contains("**Classes:**"));
        assert!(!output.contains("**Modules:**"));
        assert!(!output.contains("**Functions:**"));
    }

    #[test]
    fn test_zero_member_container_keeps_heading_only() {
        let root = tree(json!({
            "kind": "module", "name": "m", "path": "m", "docstring": "M.",
            "members": [
                {"kind": "class", "name": "Empty", "path": "m.Empty", "docstring": "Nothing public.",
                 "members": [
                    {"kind": "function", "name": "_a", "path": "m.Empty._a", "docstring": "A."},
                    {"kind": "attribute", "name": "_b", "path": "m.Empty._b", "docstring": "B."}
                 ]}
            ]
        }));
        let output = render_object_docs(&root, &UserOptions::default()).unwrap();
        let body = &output[output.find("## Empty").unwrap()..];
        assert_eq!(body, "## Empty\n\n<a id=\"m-empty\"></a>\n\nNothing public.\n");
    }

    #[test]
    fn test_members_without_docstrings_are_hidden_by_default() {
        let root = tree(json!({
            "kind": "module", "name": "m", "path": "m", "docstring": "M.",
            "members": [{"kind": "function", "name": "bare", "path": "m.bare"}]
        }));
        let hidden = render_object_docs(&root, &UserOptions::default()).unwrap();
        assert!(!hidden.contains("bare"));
        let shown = render_object_docs(&root, &options(json!({"show_if_no_docstring": true}))).unwrap();
        assert!(shown.contains("## bare"));
    }

    #[test]
    fn test_root_without_heading() {
        let output = render_object_docs(
            &small_package(),
            &options(json!({"show_root_heading": false, "heading_level": 2})),
        )
        .unwrap();
        assert!(output.starts_with("Package docs.\n"));
        assert!(output.contains("\n## area\n"));
        assert!(!output.contains("id=\"pkg\""));
    }

    #[test]
    fn test_no_replacement_characters() {
        let root = tree(json!({
            "kind": "module", "name": "m", "path": "m", "docstring": "Broken \u{FFFD} byte.",
            "members": [{"kind": "function", "name": "f", "path": "m.f", "docstring": "\u{FFFD}ok"}]
        }));
        let output = render_object_docs(&root, &UserOptions::default()).unwrap();
        assert!(!output.contains('\u{FFFD}'));
        assert!(output.contains("Broken  byte."));
    }

    #[test]
    fn test_invalid_members_order_aborts() {
        let err = render_object_docs(&small_package(), &options(json!({"members_order": "size"}))).unwrap_err();
        assert!(matches!(err, RenderError::InvalidConfig { .. }));
    }

    #[test]
    fn test_crossrefs_survive_hostile_normalizer() {
        // Escapes characters a Markdown formatter might consider syntax.
        let escaping = |text: &str| text.replace('-', "\\-").replace('[', "\\[");
        let config = resolve(&UserOptions::default()).unwrap();
        let output = Renderer::with_normalizer(escaping)
            .render(&nested_package(), &config)
            .unwrap();
        assert!(output.contains("[`Name`](#pkg-sub-name)"));
        assert!(output.contains("[the base](#pkg-sub-base)"));
    }

    #[test]
    fn test_mangled_token_surfaces_as_residual() {
        let dropping = |text: &str| {
            text.chars()
                .filter(|c| !('\u{E000}'..='\u{F8FF}').contains(c))
                .collect::<String>()
        };
        let config = resolve(&UserOptions::default()).unwrap();
        let err = Renderer::with_normalizer(dropping)
            .render(&nested_package(), &config)
            .unwrap_err();
        assert!(matches!(err, RenderError::StashResidual { .. }));
    }

    #[test]
    fn test_normalizer_sees_only_protected_text() {
        let mut normalizer = MockNormalizer::new();
        normalizer
            .expect_normalize()
            .withf(|text: &str| text.starts_with("# pkg") && !text.contains("](#"))
            .times(1)
            .returning(|text: &str| text.to_string());
        let config = resolve(&UserOptions::default()).unwrap();
        let output = Renderer::with_normalizer(normalizer)
            .render(&small_package(), &config)
            .unwrap();
        assert!(output.contains("[`area`](#pkg-area)"));
    }

    #[test]
    fn test_renders_are_independent() {
        let config = resolve(&UserOptions::default()).unwrap();
        let first = small_package();
        let second = nested_package();
        let (a, b) = std::thread::scope(|scope| {
            let a = scope.spawn(|| Renderer::new().render(&first, &config).unwrap());
            let b = scope.spawn(|| Renderer::new().render(&second, &config).unwrap());
            (a.join().unwrap(), b.join().unwrap())
        });
        assert_eq!(a, Renderer::new().render(&first, &config).unwrap());
        assert_eq!(b, Renderer::new().render(&second, &config).unwrap());
    }

    #[test]
    fn test_root_full_path_toggle() {
        let full = render_object_docs(&renamed_root(), &UserOptions::default()).unwrap();
        assert!(full.starts_with("# pkg.sub\n"));

        let short = render_object_docs(&renamed_root(), &options(json!({"show_root_full_path": false}))).unwrap();
        assert!(short.starts_with("# sub\n"));
        assert!(short.contains("<a id=\"pkg-sub\"></a>"));
    }

    #[test]
    fn test_object_full_path_toggle() {
        let short = render_object_docs(&renamed_root(), &UserOptions::default()).unwrap();
        assert!(short.contains("\n## Name\n"));
        assert!(short.contains("\n### area\n"));

        let full = render_object_docs(&renamed_root(), &options(json!({"show_object_full_path": true}))).unwrap();
        assert!(full.contains("\n## pkg.sub.Name\n"));
        assert!(full.contains("\n### pkg.sub.Name.area\n"));
        assert!(full.contains("\n## pkg.sub.inner\n"));
        assert!(!full.contains("\n## Name\n"));
    }

    #[test]
    fn test_signature_annotations_toggle() {
        let annotated = render_object_docs(&renamed_root(), &UserOptions::default()).unwrap();
        assert!(annotated.contains("```python\narea(self, scale: float = 1.0) -> float\n```"));
        assert!(annotated.contains("```python\nLIMIT: int = 3\n```"));

        let plain = render_object_docs(
            &renamed_root(),
            &options(json!({"show_signature_annotations": false})),
        )
        .unwrap();
        assert!(plain.contains("```python\narea(self, scale = 1.0)\n```"));
        assert!(plain.contains("```python\nLIMIT = 3\n```"));
        assert!(!plain.contains("float"));
    }

    #[test]
    fn test_show_submodules_toggle() {
        let all = render_object_docs(&renamed_root(), &UserOptions::default()).unwrap();
        assert!(all.contains("\n## inner\n"));
        assert!(all.contains("\n### deeper\n"));

        let shallow = render_object_docs(&renamed_root(), &options(json!({"show_submodules": false}))).unwrap();
        assert!(shallow.contains("\n## inner\n"));
        assert!(!shallow.contains("deeper"));
        assert_links_resolve(&shallow);
    }

    #[test]
    fn test_base_links_only_target_rendered_objects() {
        let root = tree(json!({
            "kind": "module", "name": "m", "path": "m", "docstring": "M.",
            "members": [
                {"kind": "class", "name": "_Base", "path": "m._Base", "docstring": "Private."},
                {"kind": "class", "name": "Bare", "path": "m.Bare"},
                {"kind": "class", "name": "Shown", "path": "m.Shown", "docstring": "Shown."},
                {"kind": "class", "name": "Pub", "path": "m.Pub", "docstring": "Public.",
                 "bases": ["m._Base", "m.Bare", "m.Shown"]}
            ]
        }));
        let output = render_object_docs(&root, &UserOptions::default()).unwrap();
        assert!(output.contains("Bases: `m._Base`, `m.Bare`, [`m.Shown`](#m-shown)"));
        assert!(!output.contains("#m-_base"));
        assert!(!output.contains("#m-bare"));
        assert_links_resolve(&output);
    }

    #[test]
    fn test_base_in_hidden_submodule_is_not_linked() {
        let root = tree(json!({
            "kind": "module", "name": "pkg", "path": "pkg", "docstring": "Pkg.",
            "members": [
                {"kind": "module", "name": "sub", "path": "pkg.sub", "docstring": "Sub.",
                 "members": [
                    {"kind": "module", "name": "inner", "path": "pkg.sub.inner", "docstring": "Inner.",
                     "members": [
                        {"kind": "class", "name": "Hidden", "path": "pkg.sub.inner.Hidden", "docstring": "H."}
                     ]},
                    {"kind": "class", "name": "Child", "path": "pkg.sub.Child", "docstring": "C.",
                     "bases": ["pkg.sub.inner.Hidden"]}
                 ]}
            ]
        }));
        let linked = render_object_docs(&root, &UserOptions::default()).unwrap();
        assert!(linked.contains("Bases: [`pkg.sub.inner.Hidden`](#pkg-sub-inner-hidden)"));

        let hidden = render_object_docs(&root, &options(json!({"show_submodules": false}))).unwrap();
        assert!(hidden.contains("Bases: `pkg.sub.inner.Hidden`"));
        assert_links_resolve(&hidden);
    }

    #[test]
    fn test_crossrefs_survive_markdown_formatting() {
        let root = tree(json!({
            "kind": "module", "name": "m", "path": "m", "docstring": "M.",
            "members": [
                {"kind": "class", "name": "Base_impl", "path": "m.Base_impl", "docstring": "Impl."},
                {"kind": "function", "name": "run", "path": "m.run",
                 "docstring": "Calls [the_base][m.Base_impl] first."}
            ]
        }));
        let output = render_object_docs(&root, &UserOptions::default()).unwrap();
        // Plain text underscores are escaped by the formatter, link text is not.
        assert!(output.contains("\n## Base\\_impl\n"));
        assert!(output.contains("Calls [the_base](#m-base_impl) first."));
        assert!(output.contains("| [`Base_impl`](#m-base_impl) | Impl. |"));
        assert_links_resolve(&output);
    }
}
