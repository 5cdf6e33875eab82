//! Reference build sequences: fresh builds, added and deleted layouts,
//! configuration variants, local dependencies, and upstream artifacts.

use std::collections::BTreeSet;

use layoutbind_conformance::{create_class, log_of, set, ModuleFixture};
use layoutbind_diagnostics::codes;
use layoutbind_store::{ClassDescriptor, Implementation, MetadataLog};

fn upstream_baz(module_package: &str) -> ClassDescriptor {
    ClassDescriptor::new("com.Baz", module_package)
        .with_variable("var1", "Int")
        .with_variable("var2", "String")
        .with_implementation(Implementation::new("foo", false, "com.Baz.Impl"))
}

// ---------------------------------------------------------------------------
// Full builds
// ---------------------------------------------------------------------------

#[test]
fn empty() {
    let module = ModuleFixture::new();
    let run = module.resolve(&module.args().incremental(false));
    let snap = run.snapshot();
    assert!(snap.invalidated.is_empty());
    assert!(snap.existing.is_empty());
    assert!(snap.files.is_empty());
    assert!(snap.unchanged.is_empty());
    assert!(run.result.mode.is_full());
    assert!(run.has_code(codes::FULL_BUILD_REQUESTED));
}

#[test]
fn fresh() {
    let module = ModuleFixture::new();
    let foo = module.create_info_file("foo", None);
    let bar = module.create_info_file("bar", None);

    let run = module.resolve(&module.args().incremental(false));
    let snap = run.snapshot();
    assert!(snap.invalidated.is_empty());
    assert!(snap.existing.is_empty());
    assert_eq!(run.result.files_to_consider, BTreeSet::from([foo, bar]));
    assert!(snap.unchanged.is_empty());
}

// ---------------------------------------------------------------------------
// Incremental builds over local layouts
// ---------------------------------------------------------------------------

#[test]
fn increment_add() {
    let module = ModuleFixture::new();
    module.create_info_file("foo", None);
    module.create_info_file("bar", None);
    module.write_log(&log_of(&["foo", "bar"]));
    let added = module.create_info_file("baz", None);

    let run = module.resolve(&module.args().with_out_of_date([added.clone()]));
    let snap = run.snapshot();
    assert!(snap.invalidated.is_empty());
    assert_eq!(snap.existing, set(&["bar", "foo"]));
    assert_eq!(run.result.files_to_consider, BTreeSet::from([added]));
    assert_eq!(snap.unchanged, set(&["bar", "foo"]));
    assert_eq!(
        run.result.existing_binding_classes.get("foo"),
        Some(&create_class("foo"))
    );
    assert!(!run.result.mode.is_full());
}

#[test]
fn increment_delete() {
    let module = ModuleFixture::new();
    module.create_info_file("foo", None);
    let bar = module.create_info_file("bar", None);
    module.write_log(&log_of(&["foo", "bar"]));
    module.delete(&bar);

    let run = module.resolve(&module.args().with_removed([bar]));
    let snap = run.snapshot();
    assert_eq!(snap.invalidated, set(&["com.Bar"]));
    assert_eq!(snap.existing, set(&["foo"]));
    assert!(snap.files.is_empty());
    assert_eq!(snap.unchanged, set(&["foo"]));
}

#[test]
fn increment_add_config_layout() {
    let module = ModuleFixture::new();
    let foo = module.create_info_file("foo", None);
    module.create_info_file("bar", None);
    module.write_log(&log_of(&["foo", "bar"]));
    let foo_land = module.create_info_file("foo", Some("land"));

    let run = module.resolve(&module.args().with_out_of_date([foo_land.clone()]));
    let snap = run.snapshot();
    assert_eq!(snap.invalidated, set(&["com.Foo"]));
    assert_eq!(snap.existing, set(&["bar"]));
    assert_eq!(run.result.files_to_consider, BTreeSet::from([foo, foo_land]));
    assert_eq!(snap.unchanged, set(&["bar"]));
}

#[test]
fn increment_remove_config_layout() {
    let module = ModuleFixture::new();
    let foo = module.create_info_file("foo", None);
    module.create_info_file("bar", None);
    let foo_land = module.create_info_file("foo", Some("land"));
    module.write_log(&log_of(&["foo", "bar"]));
    module.delete(&foo_land);

    let run = module.resolve(&module.args().with_removed([foo_land]));
    let snap = run.snapshot();
    assert_eq!(snap.invalidated, set(&["com.Foo"]));
    assert_eq!(snap.existing, set(&["bar"]));
    assert_eq!(run.result.files_to_consider, BTreeSet::from([foo]));
    assert_eq!(snap.unchanged, set(&["bar"]));
}

#[test]
fn increment_dependency() {
    let module = ModuleFixture::new();
    let foo = module.create_info_file("foo", None);
    let foo_land = module.create_info_file("foo", Some("land"));
    module.create_info_file("bar", None);
    let baz = module.create_info_file("baz", None);

    let mut log = log_of(&["foo", "bar", "baz"]);
    log.add_dependency("foo", "baz");
    module.write_log(&log);
    module.touch(&baz);

    let run = module.resolve(&module.args().with_out_of_date([baz.clone()]));
    let snap = run.snapshot();
    assert_eq!(snap.invalidated, set(&["com.Baz", "com.Foo"]));
    assert_eq!(snap.existing, set(&["bar"]));
    assert_eq!(run.result.files_to_consider, BTreeSet::from([foo, foo_land, baz]));
    assert_eq!(snap.unchanged, set(&["bar"]));
    assert!(run.result.unchanged_log.dependencies().is_empty());
}

// ---------------------------------------------------------------------------
// Upstream artifacts
// ---------------------------------------------------------------------------

#[test]
fn increment_external_dependency_new_dependency() {
    let module = ModuleFixture::new();
    let foo = module.create_info_file("foo", None);
    module.create_info_file("bar", None);

    let mut lib = MetadataLog::new();
    lib.put("baz", upstream_baz("y.x"));
    let artifact = module.write_artifact("com.baz.", &lib);
    assert_eq!(artifact.file_name().unwrap(), "com.baz.-binding_classes.json");

    let mut log = log_of(&["foo", "bar"]);
    log.add_dependency("foo", "baz");
    module.write_log(&log);

    let run = module.resolve(&module.args());
    let snap = run.snapshot();
    assert_eq!(snap.invalidated, set(&["com.Foo"]));
    assert_eq!(snap.existing, set(&["bar", "baz"]));
    assert_eq!(
        run.result.existing_binding_classes.get("baz"),
        Some(&upstream_baz("y.x"))
    );
    assert_eq!(run.result.files_to_consider, BTreeSet::from([foo]));
    assert_eq!(snap.unchanged, set(&["bar"]));
}

#[test]
fn increment_external_dependency_unrelated_change() {
    let module = ModuleFixture::new();
    module.create_info_file("foo", None);
    module.create_info_file("bar", None);

    let mut lib = MetadataLog::new();
    lib.put("baz", upstream_baz("x.y"));
    module.write_artifact("com.baz.", &lib);
    module.write_log(&log_of(&["foo", "bar"]));

    let run = module.resolve(&module.args());
    let snap = run.snapshot();
    assert!(snap.invalidated.is_empty());
    assert_eq!(snap.existing, set(&["bar", "baz", "foo"]));
    assert!(snap.files.is_empty());
    assert_eq!(snap.unchanged, set(&["bar", "foo"]));
    assert!(!run.has_code(codes::INVALID_DEPENDENCY_ARTIFACT));
}
