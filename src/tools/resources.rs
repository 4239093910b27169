use crate::core::tool::ResourceDescriptor;

static RESOURCES: [ResourceDescriptor; 3] = [
    ResourceDescriptor {
        uri: "openmetadata://table",
        name: "Table",
        description: "A table in the database",
    },
    ResourceDescriptor {
        uri: "openmetadata://glossary",
        name: "Glossary",
        description: "A glossary of business terms",
    },
    ResourceDescriptor {
        uri: "openmetadata://glossaryTerm",
        name: "Glossary Term",
        description: "A term defined within a glossary",
    },
];

/// Advertised resources in discovery order.
pub fn list_resources() -> &'static [ResourceDescriptor] {
    &RESOURCES
}
