//! Sample entity documents

/// A minimal page-layout entity document.
pub fn layout_xml(label: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Layout xmlns="http://soap.sforce.com/2006/04/metadata">
    <fullName>{label}</fullName>
    <summaryLayout>
        <masterLabel>{label}</masterLabel>
    </summaryLayout>
</Layout>
"#
    )
}

/// A minimal custom-object entity document with sharing tags.
pub fn object_xml(label: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<CustomObject xmlns="http://soap.sforce.com/2006/04/metadata">
    <sharingModel>Read</sharingModel>
    <externalSharingModel>Read</externalSharingModel>
    <label>{label}</label>
    <deploymentStatus>Deployed</deploymentStatus>
</CustomObject>
"#
    )
}
