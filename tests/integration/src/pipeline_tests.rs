//! End-to-end pipeline runs against the recording mock client.

use pretty_assertions::assert_eq;

use metl_core::{
    DeployStatus, Error, Pipeline, RunOutcome, TaskOptions, TransformOutcome, VariantSpec,
};
use metl_meta::{ApiName, EntityCatalog, Membership};
use metl_test_utils::{MockTransferClient, layout_xml};
use metl_xml::XmlDocument;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("metl_core=debug")
        .with_test_writer()
        .try_init();
}

fn options_for(api_names: &[&str]) -> TaskOptions {
    let mut options = TaskOptions::new("52.0");
    options.api_names = api_names.iter().map(|n| n.to_string()).collect();
    options
}

fn passthrough(doc: XmlDocument, _api_name: &str) -> metl_core::Result<TransformOutcome> {
    Ok(TransformOutcome::Deploy(doc))
}

#[test]
fn single_entity_run_deploys_surviving_instance() {
    init_logging();
    let client =
        MockTransferClient::new().with_fixture("layouts/Foo Layout.layout", &layout_xml("Foo"));
    let catalog = EntityCatalog::with_builtins();

    let mut pipeline = Pipeline::single_entity(
        &client,
        &catalog,
        options_for(&["Foo Layout"]),
        "Layout",
        Box::new(passthrough),
    );
    let outcome = pipeline.run().unwrap();

    let RunOutcome::Deployed(result) = outcome else {
        panic!("expected a deployed outcome");
    };
    assert_eq!(result.status, DeployStatus::Succeeded);

    // The retrieve request declares the pre-expansion membership.
    let retrieves = client.retrieve_manifests();
    assert_eq!(retrieves.len(), 1);
    assert!(retrieves[0].contains("<members>Foo Layout</members>"));

    let deploys = client.deploys();
    assert_eq!(deploys.len(), 1);
    let deploy = &deploys[0];
    assert_eq!(deploy.files(), vec!["layouts/Foo Layout.layout", "package.xml"]);
    assert!(deploy.manifest.contains("<members>Foo Layout</members>"));
    assert!(deploy.manifest.contains("<name>Layout</name>"));
    assert!(deploy.manifest.contains("<version>52.0</version>"));
    assert_eq!(deploy.manifest.matches("<members>").count(), 1);
}

#[test]
fn wildcard_request_expands_against_retrieved_content() {
    init_logging();
    let client = MockTransferClient::new()
        .with_fixture("layouts/b.layout", &layout_xml("b"))
        .with_fixture("layouts/a.layout", &layout_xml("a"))
        .with_fixture("layouts/c.layout", &layout_xml("c"));
    let catalog = EntityCatalog::with_builtins();

    let mut pipeline = Pipeline::single_entity(
        &client,
        &catalog,
        options_for(&["*"]),
        "Layout",
        Box::new(passthrough),
    );
    pipeline.run().unwrap();

    // The wildcard goes out in the retrieve request but never in the
    // deploy manifest.
    assert!(client.retrieve_manifests()[0].contains("<members>*</members>"));

    let deploy = &client.deploys()[0];
    assert!(!deploy.manifest.contains("<members>*</members>"));
    let a_at = deploy.manifest.find("<members>a</members>").unwrap();
    let b_at = deploy.manifest.find("<members>b</members>").unwrap();
    let c_at = deploy.manifest.find("<members>c</members>").unwrap();
    assert!(a_at < b_at && b_at < c_at);
}

#[test]
fn suppressed_instances_drop_out_of_manifest_and_files() {
    init_logging();
    let client = MockTransferClient::new()
        .with_fixture("layouts/X.layout", &layout_xml("X"))
        .with_fixture("layouts/Y.layout", &layout_xml("Y"));
    let catalog = EntityCatalog::with_builtins();

    let transform = |doc: XmlDocument, api_name: &str| -> metl_core::Result<TransformOutcome> {
        if api_name == "X" {
            Ok(TransformOutcome::Suppress)
        } else {
            Ok(TransformOutcome::Deploy(doc))
        }
    };
    let mut pipeline = Pipeline::single_entity(
        &client,
        &catalog,
        options_for(&["X", "Y"]),
        "Layout",
        Box::new(transform),
    );
    pipeline.run().unwrap();

    let deploy = &client.deploys()[0];
    assert_eq!(deploy.files(), vec!["layouts/Y.layout", "package.xml"]);
    assert!(!deploy.manifest.contains("<members>X</members>"));
    assert!(deploy.manifest.contains("<members>Y</members>"));
}

#[test]
fn missing_source_file_aborts_before_any_deploy() {
    init_logging();
    let client = MockTransferClient::new();
    let catalog = EntityCatalog::with_builtins();

    let mut pipeline = Pipeline::single_entity(
        &client,
        &catalog,
        options_for(&["Z"]),
        "Layout",
        Box::new(passthrough),
    );
    let err = pipeline.run().unwrap_err();

    match err {
        Error::MissingSourceFile { path } => {
            assert!(path.ends_with("layouts/Z.layout"), "got {}", path.display());
        }
        other => panic!("expected MissingSourceFile, got {other}"),
    }
    assert!(client.deploys().is_empty());
}

#[test]
fn synthesis_builds_manifest_by_scanning_the_deploy_area() {
    init_logging();
    let client = MockTransferClient::new();
    let catalog = EntityCatalog::with_builtins();

    let synthesize = |deploy_root: &std::path::Path| -> metl_core::Result<()> {
        let layouts = deploy_root.join("layouts");
        std::fs::create_dir_all(&layouts).map_err(|e| Error::io(&layouts, e))?;
        std::fs::write(layouts.join("New Layout.layout"), layout_xml("New"))
            .map_err(|e| Error::io(&layouts, e))?;
        Ok(())
    };
    let mut pipeline = Pipeline::synthesis(
        &client,
        &catalog,
        TaskOptions::new("52.0"),
        Box::new(synthesize),
    );
    pipeline.run().unwrap();

    assert!(client.retrieve_manifests().is_empty());
    let deploy = &client.deploys()[0];
    assert!(deploy.manifest.contains("<members>New Layout</members>"));
    assert!(deploy.manifest.contains("<name>Layout</name>"));
}

#[test]
fn batch_variant_unions_surviving_types_in_declared_order() {
    init_logging();
    let client = MockTransferClient::new()
        .with_fixture("layouts/L.layout", &layout_xml("L"))
        .with_fixture("tabs/T.tab", "<CustomTab xmlns=\"x\"><label>T</label></CustomTab>");
    let catalog = EntityCatalog::with_builtins();

    let mut declared = Membership::new();
    declared.insert("CustomTab", ApiName::new("T"));
    declared.insert("Layout", ApiName::new("L"));

    let batch_catalog = EntityCatalog::with_builtins();
    let transform = move |retrieve_root: &std::path::Path,
                          deploy_root: &std::path::Path|
          -> metl_core::Result<Membership> {
        let mut surviving = Membership::new();
        for entity_type in ["CustomTab", "Layout"] {
            let requested = [ApiName::WILDCARD].iter().map(|n| ApiName::new(n)).collect();
            let names = metl_core::transform_entity_files(
                &batch_catalog,
                retrieve_root,
                deploy_root,
                entity_type,
                &requested,
                &mut passthrough,
            )?;
            surviving.insert_all(entity_type, names);
        }
        Ok(surviving)
    };
    let mut pipeline = Pipeline::transform_batch(
        &client,
        &catalog,
        TaskOptions::new("52.0"),
        declared,
        Box::new(transform),
    );
    pipeline.run().unwrap();

    let deploy = &client.deploys()[0];
    let tab_at = deploy.manifest.find("<name>CustomTab</name>").unwrap();
    let layout_at = deploy.manifest.find("<name>Layout</name>").unwrap();
    assert!(tab_at < layout_at);
}

#[test]
fn variant_without_deploy_stages_only() {
    init_logging();
    let client =
        MockTransferClient::new().with_fixture("layouts/A.layout", &layout_xml("A"));
    let catalog = EntityCatalog::with_builtins();

    let mut pipeline = Pipeline::single_entity(
        &client,
        &catalog,
        options_for(&["A"]),
        "Layout",
        Box::new(passthrough),
    )
    .with_variant(VariantSpec {
        needs_retrieve: true,
        needs_deploy: false,
    });
    let outcome = pipeline.run().unwrap();

    assert!(matches!(outcome, RunOutcome::Staged));
    assert!(client.deploys().is_empty());
}

#[test]
fn remote_failures_propagate_unchanged() {
    init_logging();
    let catalog = EntityCatalog::with_builtins();

    let client = MockTransferClient::new().failing_retrieve("org unavailable");
    let mut pipeline = Pipeline::single_entity(
        &client,
        &catalog,
        options_for(&["A"]),
        "Layout",
        Box::new(passthrough),
    );
    let err = pipeline.run().unwrap_err();
    assert!(matches!(err, Error::Remote { .. }));
    assert!(err.to_string().contains("org unavailable"));

    let client = MockTransferClient::new()
        .with_fixture("layouts/A.layout", &layout_xml("A"))
        .failing_deploy("validation failed");
    let mut pipeline = Pipeline::single_entity(
        &client,
        &catalog,
        options_for(&["A"]),
        "Layout",
        Box::new(passthrough),
    );
    let err = pipeline.run().unwrap_err();
    assert!(err.to_string().contains("validation failed"));
}

#[test]
fn post_deploy_failure_fails_the_run_but_reports_deploy_status() {
    init_logging();
    let client =
        MockTransferClient::new().with_fixture("layouts/A.layout", &layout_xml("A"));
    let catalog = EntityCatalog::with_builtins();

    let mut pipeline = Pipeline::single_entity(
        &client,
        &catalog,
        options_for(&["A"]),
        "Layout",
        Box::new(passthrough),
    )
    .with_post_deploy(Box::new(|_result| -> metl_core::Result<()> {
        Err(Error::task("enablement never completed"))
    }));
    let err = pipeline.run().unwrap_err();

    // The deploy itself committed; only the post step failed.
    assert_eq!(client.deploys().len(), 1);
    match err {
        Error::PostDeploy { status, source } => {
            assert_eq!(status, DeployStatus::Succeeded);
            assert!(source.to_string().contains("enablement never completed"));
        }
        other => panic!("expected PostDeploy, got {other}"),
    }
}

#[test]
fn managed_options_flow_into_manifest_and_deploy_call() {
    init_logging();
    let client = MockTransferClient::new()
        .with_fixture("layouts/ns__A.layout", &layout_xml("A"));
    let catalog = EntityCatalog::with_builtins();

    let mut options = options_for(&["%%%NAMESPACE%%%A"]);
    options.managed = true;
    options.namespace_inject = Some("ns".to_string());

    let mut pipeline =
        Pipeline::single_entity(&client, &catalog, options, "Layout", Box::new(passthrough));
    pipeline.run().unwrap();

    assert!(client.retrieve_manifests()[0].contains("<members>ns__A</members>"));
    let deploy = &client.deploys()[0];
    assert!(deploy.options.managed);
    assert_eq!(deploy.options.namespace_inject.as_deref(), Some("ns"));
}
