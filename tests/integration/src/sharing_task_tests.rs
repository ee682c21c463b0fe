//! End-to-end runs of the built-in sharing-defaults task.

use pretty_assertions::assert_eq;

use metl_core::{Pipeline, SharingDefaults, TaskOptions};
use metl_meta::EntityCatalog;
use metl_test_utils::{MockTransferClient, object_xml};

#[test]
fn sharing_defaults_rewrite_object_sharing_tags() {
    let client = MockTransferClient::new()
        .with_fixture("objects/Test__c.object", &object_xml("Test"))
        .with_fixture("objects/Account.object", &object_xml("Account"));

    let mut task = SharingDefaults::new();
    task.set("Account", Some("Private"), Some("Private")).unwrap();
    task.set("Test__c", Some("ReadWrite"), Some("Read")).unwrap();

    let mut options = TaskOptions::new("52.0");
    options.api_names = task.api_names();

    let catalog = EntityCatalog::with_builtins();
    let mut pipeline = Pipeline::single_entity(
        &client,
        &catalog,
        options,
        SharingDefaults::ENTITY_TYPE,
        Box::new(task),
    );
    pipeline.run().unwrap();

    let deploy = &client.deploys()[0];
    assert_eq!(
        deploy.files(),
        vec![
            "objects/Account.object",
            "objects/Test__c.object",
            "package.xml"
        ]
    );
    assert!(deploy.manifest.contains("<name>CustomObject</name>"));

    let test_object = &deploy.contents["objects/Test__c.object"];
    assert!(test_object.contains("<sharingModel>ReadWrite</sharingModel>"));
    assert!(test_object.contains("<externalSharingModel>Read</externalSharingModel>"));

    let account = &deploy.contents["objects/Account.object"];
    assert!(account.contains("<sharingModel>Private</sharingModel>"));
    assert!(account.contains("<externalSharingModel>Private</externalSharingModel>"));
}

#[test]
fn sharing_defaults_synthesize_missing_tags() {
    const BARE_OBJECT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomObject xmlns="http://soap.sforce.com/2006/04/metadata">
    <label>Bare</label>
</CustomObject>"#;

    let client = MockTransferClient::new().with_fixture("objects/Bare__c.object", BARE_OBJECT);

    let mut task = SharingDefaults::new();
    task.set("Bare__c", Some("Read"), Some("Private")).unwrap();

    let mut options = TaskOptions::new("52.0");
    options.api_names = task.api_names();

    let catalog = EntityCatalog::with_builtins();
    let mut pipeline = Pipeline::single_entity(
        &client,
        &catalog,
        options,
        SharingDefaults::ENTITY_TYPE,
        Box::new(task),
    );
    pipeline.run().unwrap();

    let object = &client.deploys()[0].contents["objects/Bare__c.object"];
    assert!(object.contains("<sharingModel>Read</sharingModel>"));
    assert!(object.contains("<externalSharingModel>Private</externalSharingModel>"));
}
