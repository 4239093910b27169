//! Static tool catalog. Declaration order is the discovery order.

use std::str::FromStr;

use crate::core::error::DispatchError;
use crate::core::tool::{DefaultValue, ParamSpec, ToolDescriptor};
use crate::domain::Include;

const TABLE_FIELDS_EXAMPLE: &str = "name,description,columns,tags,href";
const GLOSSARY_FIELDS_EXAMPLE: &str = "owners,tags,reviewers,usageCount,termCount,domain,extension";
const TERM_FIELDS_EXAMPLE: &str =
    "children,relatedTerms,reviewers,owners,tags,usageCount,domain,extension,childrenCount";

const INCLUDE: ParamSpec =
    ParamSpec::string("include", "Include all, deleted, or non-deleted entities.")
        .default_value(DefaultValue::String("non-deleted"))
        .choices(&Include::VALUES);

const LIST_TABLES: ToolDescriptor = ToolDescriptor {
    name: "list_tables",
    description: "List tables from OpenMetadata",
    params: &[
        ParamSpec::integer("limit", "Maximum number of tables to return")
            .default_value(DefaultValue::Integer(10)),
        ParamSpec::integer("offset", "Number of tables to skip")
            .default_value(DefaultValue::Integer(0)),
    ],
};

const GET_TABLE: ToolDescriptor = ToolDescriptor {
    name: "get_table",
    description: "Get details of a specific table by ID",
    params: &[
        ParamSpec::string("table_id", "ID of the table to retrieve")
            .format("uuid")
            .required(),
        ParamSpec::string("fields", "Fields to include in the response")
            .example(TABLE_FIELDS_EXAMPLE),
    ],
};

const GET_TABLE_BY_NAME: ToolDescriptor = ToolDescriptor {
    name: "get_table_by_name",
    description: "Get details of a specific table by fully qualified name",
    params: &[
        ParamSpec::string("fqn", "Fully qualified name of the table").required(),
        ParamSpec::string("fields", "Fields to include in the response")
            .example(TABLE_FIELDS_EXAMPLE),
    ],
};

const CREATE_TABLE: ToolDescriptor = ToolDescriptor {
    name: "create_table",
    description: "Create a new table",
    params: &[ParamSpec::object(
        "table_data",
        "Table data including name, description, columns, etc.",
    )
    .required()],
};

const UPDATE_TABLE: ToolDescriptor = ToolDescriptor {
    name: "update_table",
    description: "Update an existing table",
    params: &[
        ParamSpec::string("table_id", "ID of the table to update")
            .format("uuid")
            .required(),
        ParamSpec::object("table_data", "Updated table data").required(),
    ],
};

const DELETE_TABLE: ToolDescriptor = ToolDescriptor {
    name: "delete_table",
    description: "Delete a table",
    params: &[
        ParamSpec::string("table_id", "ID of the table to delete")
            .format("uuid")
            .required(),
        ParamSpec::boolean("hard_delete", "Whether to perform a hard delete")
            .default_value(DefaultValue::Boolean(false)),
        ParamSpec::boolean("recursive", "Whether to recursively delete children")
            .default_value(DefaultValue::Boolean(false)),
    ],
};

const LIST_GLOSSARIES: ToolDescriptor = ToolDescriptor {
    name: "list_glossaries",
    description: "List glossaries from OpenMetadata",
    params: &[
        ParamSpec::integer("limit", "Maximum number of glossaries to return")
            .default_value(DefaultValue::Integer(10)),
        ParamSpec::string("fields", "Fields to include in the returned resource")
            .example(GLOSSARY_FIELDS_EXAMPLE),
        ParamSpec::string("before", "Returns list of glossaries before this cursor"),
        ParamSpec::string("after", "Returns list of glossaries after this cursor"),
        INCLUDE,
    ],
};

const GET_GLOSSARY_BY_NAME: ToolDescriptor = ToolDescriptor {
    name: "get_glossary_by_name",
    description: "Get details of a specific glossary by fully qualified name",
    params: &[
        ParamSpec::string("fqn", "Fully qualified name of the glossary").required(),
        ParamSpec::string("fields", "Fields to include in the returned resource")
            .example(GLOSSARY_FIELDS_EXAMPLE),
        INCLUDE,
    ],
};

const LIST_GLOSSARY_TERMS: ToolDescriptor = ToolDescriptor {
    name: "list_glossary_terms",
    description: "List glossary terms from OpenMetadata, optionally filtered by glossary FQN.",
    params: &[
        ParamSpec::string(
            "glossary_fqn",
            "Fully qualified name of the glossary to filter terms from.",
        ),
        ParamSpec::integer("limit", "Maximum number of terms to return")
            .default_value(DefaultValue::Integer(10)),
        ParamSpec::string("fields", "Fields to include in the returned resource")
            .example(TERM_FIELDS_EXAMPLE),
        ParamSpec::string("before", "Returns list of terms before this cursor"),
        ParamSpec::string("after", "Returns list of terms after this cursor"),
        INCLUDE,
    ],
};

const GET_GLOSSARY_TERM_BY_NAME: ToolDescriptor = ToolDescriptor {
    name: "get_glossary_term_by_name",
    description: "Get details of a specific glossary term by fully qualified name.",
    params: &[
        ParamSpec::string(
            "fqn",
            "Fully qualified name of the glossary term (e.g., 'GlossaryName.TermName')",
        )
        .required(),
        ParamSpec::string("fields", "Fields to include in the returned resource")
            .example(TERM_FIELDS_EXAMPLE),
        INCLUDE,
    ],
};

/// Every invocable operation. Variant order matches `TOOLS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    ListTables,
    GetTable,
    GetTableByName,
    CreateTable,
    UpdateTable,
    DeleteTable,
    ListGlossaries,
    GetGlossaryByName,
    ListGlossaryTerms,
    GetGlossaryTermByName,
}

static TOOLS: [ToolDescriptor; 10] = [
    LIST_TABLES,
    GET_TABLE,
    GET_TABLE_BY_NAME,
    CREATE_TABLE,
    UPDATE_TABLE,
    DELETE_TABLE,
    LIST_GLOSSARIES,
    GET_GLOSSARY_BY_NAME,
    LIST_GLOSSARY_TERMS,
    GET_GLOSSARY_TERM_BY_NAME,
];

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        ToolKind::ListTables,
        ToolKind::GetTable,
        ToolKind::GetTableByName,
        ToolKind::CreateTable,
        ToolKind::UpdateTable,
        ToolKind::DeleteTable,
        ToolKind::ListGlossaries,
        ToolKind::GetGlossaryByName,
        ToolKind::ListGlossaryTerms,
        ToolKind::GetGlossaryTermByName,
    ];

    pub fn descriptor(self) -> &'static ToolDescriptor {
        &TOOLS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl FromStr for ToolKind {
    type Err = DispatchError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))
    }
}

/// All tool descriptors in discovery order.
pub fn list_tools() -> &'static [ToolDescriptor] {
    &TOOLS
}
