//! Declarative catalog of resource families.
//!
//! Every collection served by the API is described by one [`ResourceSpec`]
//! entry. The table drives route mounting, create validation and the
//! shaping applied to client payloads before they reach the store, so
//! adding a family is one more entry rather than another set of handlers.
use crate::types::timestamp;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// How the creation timestamp is stamped on insert.
#[derive(Clone, Copy, Debug)]
pub enum CreatedStamp {
    /// No creation timestamp.
    None,
    /// Server clock always wins; client values are discarded.
    Always(&'static str),
    /// Client may supply its own value; stamped only when blank.
    IfAbsent(&'static str),
}

/// Fallback value filled in when the client omits a field on create.
#[derive(Clone, Copy, Debug)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Str(&'static str),
}

impl From<DefaultValue> for Value {
    fn from(default: DefaultValue) -> Self {
        match default {
            DefaultValue::Bool(b) => Value::Bool(b),
            DefaultValue::Int(n) => Value::from(n),
            DefaultValue::Str(s) => Value::String(s.to_owned()),
        }
    }
}

/// Payload normalization applied before a write.
#[derive(Clone, Copy, Debug)]
pub enum Normalize {
    /// Split a comma separated string field into trimmed, non-empty
    /// entries. Values already in list form pass through untouched.
    CsvList(&'static str),
}

/// Static description of one resource family.
#[derive(Debug)]
pub struct ResourceSpec {
    /// Route segment under which the family is mounted.
    pub path: &'static str,
    /// Backing collection name.
    pub collection: &'static str,
    /// Fields that must be present and non-blank on create.
    pub required: &'static [&'static str],
    /// Fields filled in on create when absent.
    pub defaults: &'static [(&'static str, DefaultValue)],
    /// Fields pinned to a fixed value on create, whatever the client sent.
    pub pinned: &'static [(&'static str, DefaultValue)],
    /// Fixed equality filter applied to every list.
    pub list_filter: Option<(&'static str, &'static str)>,
    /// Fixed sort applied to every list; 1 ascending, -1 descending.
    pub sort: &'static [(&'static str, i8)],
    pub created: CreatedStamp,
    /// Field restamped with the server clock on every write, if any.
    pub touched: Option<&'static str>,
    pub normalize: &'static [Normalize],
    /// Whether the list operation is paginated.
    pub paged: bool,
}

impl ResourceSpec {
    const fn collection(path: &'static str, collection: &'static str) -> Self {
        Self {
            path,
            collection,
            required: &[],
            defaults: &[],
            pinned: &[],
            list_filter: None,
            sort: &[],
            created: CreatedStamp::None,
            touched: None,
            normalize: &[],
            paged: false,
        }
    }
}

/// Every resource family served by the API, in mount order.
pub static RESOURCES: &[ResourceSpec] = &[
    ResourceSpec::collection("donors", "donors"),
    ResourceSpec::collection("hospitals", "hospitals"),
    ResourceSpec::collection("doctors", "doctors"),
    ResourceSpec::collection("ambulances", "ambulances"),
    ResourceSpec::collection("fire-stations", "fire-stations"),
    ResourceSpec {
        required: &["name", "address", "officer"],
        defaults: &[
            ("contact", DefaultValue::Str("")),
            ("image", DefaultValue::Str("")),
        ],
        ..ResourceSpec::collection("policestations", "policestations")
    },
    ResourceSpec {
        // Submissions wait for approval; the flag is never client-settable.
        pinned: &[("approved", DefaultValue::Bool(false))],
        ..ResourceSpec::collection("lawyers", "lawyers")
    },
    ResourceSpec::collection("stations", "stations"),
    ResourceSpec::collection("journalists", "journalists"),
    ResourceSpec {
        required: &["name", "location", "category", "district"],
        list_filter: Some(("district", "bogura")),
        ..ResourceSpec::collection("destinations", "destinations")
    },
    ResourceSpec::collection("buses", "buses"),
    ResourceSpec::collection("couriers", "couriers"),
    ResourceSpec::collection("educations", "educations"),
    ResourceSpec::collection("electricities", "electricities"),
    ResourceSpec::collection("internet-providers", "internetProviders"),
    ResourceSpec {
        required: &["title", "content", "category", "author"],
        created: CreatedStamp::IfAbsent("publishDate"),
        normalize: &[Normalize::CsvList("tags")],
        ..ResourceSpec::collection("news", "news")
    },
    ResourceSpec {
        required: &["title", "description"],
        created: CreatedStamp::IfAbsent("publishDate"),
        sort: &[("publishDate", -1)],
        ..ResourceSpec::collection("notices", "notices")
    },
    ResourceSpec::collection("esheba", "esheba"),
    ResourceSpec::collection("unions", "unions"),
    ResourceSpec {
        created: CreatedStamp::Always("createdAt"),
        ..ResourceSpec::collection("water-offices", "waterOffices")
    },
    ResourceSpec {
        created: CreatedStamp::Always("createdAt"),
        sort: &[("name", 1)],
        ..ResourceSpec::collection("municipalities", "municipalities")
    },
    ResourceSpec {
        created: CreatedStamp::Always("createdAt"),
        sort: &[("name", 1)],
        ..ResourceSpec::collection("restaurants", "restaurants")
    },
    ResourceSpec {
        created: CreatedStamp::Always("createdAt"),
        sort: &[("date", 1)],
        ..ResourceSpec::collection("events", "events")
    },
    ResourceSpec {
        created: CreatedStamp::Always("createdAt"),
        ..ResourceSpec::collection("rent-cars", "rent_cars")
    },
    ResourceSpec {
        created: CreatedStamp::Always("createdAt"),
        sort: &[("createdAt", -1)],
        ..ResourceSpec::collection("blogs", "blogs")
    },
    ResourceSpec::collection("famous", "famous"),
    ResourceSpec {
        created: CreatedStamp::Always("createdAt"),
        sort: &[("createdAt", -1)],
        ..ResourceSpec::collection("contacts", "contacts")
    },
    ResourceSpec::collection("ads", "ads"),
    ResourceSpec::collection("content-creators", "content-creators"),
    ResourceSpec::collection("sliders", "sliders"),
    ResourceSpec {
        defaults: &[
            ("link", DefaultValue::Str("")),
            ("isActive", DefaultValue::Bool(true)),
            ("order", DefaultValue::Int(0)),
        ],
        created: CreatedStamp::Always("createdAt"),
        touched: Some("updatedAt"),
        sort: &[("order", 1), ("createdAt", -1)],
        ..ResourceSpec::collection("partners", "partners")
    },
    ResourceSpec {
        created: CreatedStamp::Always("createdAt"),
        touched: Some("updatedAt"),
        sort: &[("createdAt", -1)],
        paged: true,
        ..ResourceSpec::collection("disaster-reports", "disaster-reports")
    },
];

/// Lookup a resource family by its route segment.
pub fn resource(path: &str) -> Option<&'static ResourceSpec> {
    RESOURCES.iter().find(|spec| spec.path == path)
}

/// Error raised when a create payload is missing required fields.
#[derive(Debug)]
pub struct MissingFields(pub Vec<&'static str>);

impl ResourceSpec {
    /// Shape a client payload for insertion: reject blank required
    /// fields, strip any client-supplied identifier, pin and default
    /// fields, normalize, and stamp timestamps.
    pub fn prepare_insert(
        &self,
        mut doc: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Result<Map<String, Value>, MissingFields> {
        doc.remove("_id");

        let missing = self
            .required
            .iter()
            .copied()
            .filter(|field| is_blank(doc.get(*field)))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(MissingFields(missing));
        }

        for (field, value) in self.pinned {
            doc.insert((*field).to_owned(), Value::from(*value));
        }
        for (field, value) in self.defaults {
            doc.entry(*field).or_insert_with(|| Value::from(*value));
        }
        self.apply_normalize(&mut doc);

        match self.created {
            CreatedStamp::None => {}
            CreatedStamp::Always(field) => {
                doc.insert(field.to_owned(), Value::String(timestamp(now)));
            }
            CreatedStamp::IfAbsent(field) => {
                if is_blank(doc.get(field)) {
                    doc.insert(field.to_owned(), Value::String(timestamp(now)));
                }
            }
        }
        if let Some(field) = self.touched {
            doc.insert(field.to_owned(), Value::String(timestamp(now)));
        }

        Ok(doc)
    }

    /// Shape a client payload for a set-semantics update. The identifier
    /// can never be overwritten, and families with an update timestamp
    /// get it restamped. An empty result means there is nothing to
    /// update and the caller should refuse the request.
    pub fn prepare_update(
        &self,
        mut doc: Map<String, Value>,
        now: DateTime<Utc>,
    ) -> Map<String, Value> {
        doc.remove("_id");
        self.apply_normalize(&mut doc);

        if !doc.is_empty() {
            if let Some(field) = self.touched {
                doc.insert(field.to_owned(), Value::String(timestamp(now)));
            }
        }

        doc
    }

    fn apply_normalize(&self, doc: &mut Map<String, Value>) {
        for rule in self.normalize {
            match rule {
                Normalize::CsvList(field) => {
                    let Some(Value::String(raw)) = doc.get(*field) else {
                        continue;
                    };
                    let entries = raw
                        .split(',')
                        .map(str::trim)
                        .filter(|entry| !entry.is_empty())
                        .map(|entry| Value::String(entry.to_owned()))
                        .collect();
                    doc.insert((*field).to_owned(), Value::Array(entries));
                }
            }
        }
    }
}

// Mirrors the truthiness checks the frontends rely on: a field given as
// an empty string counts as missing.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}
