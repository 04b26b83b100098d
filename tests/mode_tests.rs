//! Mode table and merged compiler configuration.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use translator_snapshots::mode::{
    DependencyResolver, ModuleFormat, OutputTarget, VirtualDependency,
};
use translator_snapshots::Mode;

#[test]
fn test_mode_names_are_unique() {
    let names: HashSet<&str> = Mode::ALL.iter().map(|m| m.name()).collect();

    assert_eq!(names.len(), Mode::ALL.len());
}

#[test]
fn test_mode_names_round_trip() {
    for mode in Mode::ALL {
        assert_eq!(Mode::from_name(mode.name()), Some(mode));
    }
    assert_eq!(Mode::from_name("unknown"), None);
}

#[test]
fn test_mode_table() {
    let table: Vec<(&str, OutputTarget, Option<ModuleFormat>, bool, bool)> = Mode::ALL
        .iter()
        .map(|m| {
            let s = m.settings();
            (m.name(), s.output, s.modules, s.optimize, s.resolver.is_some())
        })
        .collect();

    assert_eq!(
        table,
        vec![
            ("cjs", OutputTarget::Html, Some(ModuleFormat::Cjs), false, false),
            ("html", OutputTarget::Html, None, false, false),
            ("htmlProduction", OutputTarget::Html, None, true, false),
            ("vdom", OutputTarget::Dom, None, false, false),
            ("vdomProduction", OutputTarget::Dom, None, true, false),
            ("generated", OutputTarget::Migrate, None, false, false),
            ("hydrate", OutputTarget::Hydrate, None, false, true),
        ]
    );
}

#[test]
fn test_only_generated_regenerates_source() {
    let regenerating: Vec<Mode> = Mode::ALL
        .into_iter()
        .filter(|m| m.regenerates_source())
        .collect();

    assert_eq!(regenerating, vec![Mode::Generated]);
}

#[test]
fn test_every_mode_disables_ambient_config_and_version_comment() {
    for mode in Mode::ALL {
        let config = mode.compiler_config();
        assert!(!config.babel_config.babelrc, "{}", mode);
        assert!(!config.babel_config.config_file, "{}", mode);
        assert!(!config.write_version_comment, "{}", mode);
    }
}

#[test]
fn test_compiler_config_wire_shape() {
    let json = serde_json::to_value(Mode::Cjs.compiler_config()).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "output": "html",
            "modules": "cjs",
            "optimize": false,
            "babelConfig": { "babelrc": false, "configFile": false },
            "writeVersionComment": false
        })
    );

    let hydrate = serde_json::to_value(Mode::Hydrate.compiler_config()).unwrap();
    assert_eq!(hydrate["output"], "hydrate");
    assert_eq!(hydrate["resolveVirtualDependency"], "virtualPath");
}

#[test]
fn test_hydrate_resolver_returns_virtual_path_verbatim() {
    let resolver = Mode::Hydrate.settings().resolver.unwrap();
    let dependency = VirtualDependency {
        virtual_path: "./template.marko.css".to_string(),
        code: Some(".a { color: red }".to_string()),
    };

    assert_eq!(resolver, DependencyResolver::VirtualPath);
    assert_eq!(
        resolver.resolve(Path::new("/somewhere/else/components/template.marko"), &dependency),
        PathBuf::from("./template.marko.css")
    );
}
