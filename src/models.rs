use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub business_id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub landmark: String,
    /// Human-facing location code, distinct from the numeric id
    #[serde(default)]
    pub location_id: String,
    pub business_id: i64,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub mobile_no: String,
    pub business_id: i64,
}

/// The backend is inconsistent about whether phone numbers are strings or numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Envelope every list endpoint wraps its records in
#[derive(Debug, Deserialize)]
pub struct ListEnvelope<T> {
    /// Absent and `null` both decode to `None`
    pub data: Option<Vec<T>>,
}

/// Business record types administered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Category,
    Location,
    Supplier,
    /// The role listing endpoint answers with category-shaped records
    Role,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Category,
        EntityKind::Location,
        EntityKind::Supplier,
        EntityKind::Role,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            EntityKind::Category => "category",
            EntityKind::Location => "location",
            EntityKind::Supplier => "supplier",
            EntityKind::Role => "role",
        }
    }

    /// Plural heading used by screens and the sidebar
    pub fn plural(&self) -> &str {
        match self {
            EntityKind::Category => "Categories",
            EntityKind::Location => "Locations",
            EntityKind::Supplier => "Suppliers",
            EntityKind::Role => "Roles",
        }
    }

    pub fn singular(&self) -> &str {
        match self {
            EntityKind::Category => "Category",
            EntityKind::Location => "Location",
            EntityKind::Supplier => "Supplier",
            EntityKind::Role => "Role",
        }
    }

    pub fn list_path(&self) -> &str {
        match self {
            EntityKind::Category => "/categories",
            EntityKind::Location => "/locations",
            EntityKind::Supplier => "/suppliers",
            EntityKind::Role => "/role",
        }
    }

    /// Roles are created through the category endpoint
    pub fn create_path(&self) -> &str {
        match self {
            EntityKind::Category | EntityKind::Role => "/categories/create",
            EntityKind::Location => "/locations/create",
            EntityKind::Supplier => "/suppliers/create",
        }
    }

    /// Dashboard route the sidebar links to
    pub fn route(&self) -> &str {
        match self {
            EntityKind::Category => "/dashboard/categories",
            EntityKind::Location => "/dashboard/locations",
            EntityKind::Supplier => "/dashboard/suppliers",
            EntityKind::Role => "/dashboard/roles",
        }
    }

    /// Lists whose records are re-sorted newest first after receipt
    pub fn sorts_desc_by_id(&self) -> bool {
        matches!(self, EntityKind::Category | EntityKind::Role)
    }

    pub fn tag(&self) -> CacheTag {
        match self {
            EntityKind::Category => CacheTag::Category,
            EntityKind::Location => CacheTag::Location,
            EntityKind::Supplier => CacheTag::Supplier,
            EntityKind::Role => CacheTag::Role,
        }
    }

    pub fn parse(value: &str) -> Option<EntityKind> {
        match value.to_lowercase().as_str() {
            "category" | "categories" => Some(EntityKind::Category),
            "location" | "locations" => Some(EntityKind::Location),
            "supplier" | "suppliers" => Some(EntityKind::Supplier),
            "role" | "roles" => Some(EntityKind::Role),
            _ => None,
        }
    }
}

/// Invalidation tags attached to cached list results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheTag {
    Category,
    Location,
    Supplier,
    Role,
}

/// Requested page size; `All` is sent as the backend's unbounded sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSize {
    All,
    Limit(u32),
}

impl PageSize {
    pub fn as_param(&self) -> i64 {
        match self {
            PageSize::All => -1,
            PageSize::Limit(n) => i64::from(*n),
        }
    }
}

/// Identity of one cached list query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub kind: EntityKind,
    pub business_id: i64,
    pub per_page: PageSize,
}

impl QueryKey {
    pub fn all(kind: EntityKind, business_id: i64) -> Self {
        Self {
            kind,
            business_id,
            per_page: PageSize::All,
        }
    }

    pub fn tag(&self) -> CacheTag {
        self.kind.tag()
    }
}

/// Any record the dashboard can list
#[derive(Debug, Clone, PartialEq)]
pub enum EntityRecord {
    Category(Category),
    Location(Location),
    Supplier(Supplier),
}

impl EntityRecord {
    pub fn id(&self) -> i64 {
        match self {
            EntityRecord::Category(c) => c.id,
            EntityRecord::Location(l) => l.id,
            EntityRecord::Supplier(s) => s.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EntityRecord::Category(c) => &c.name,
            EntityRecord::Location(l) => &l.name,
            EntityRecord::Supplier(s) => &s.name,
        }
    }

    pub fn business_id(&self) -> i64 {
        match self {
            EntityRecord::Category(c) => c.business_id,
            EntityRecord::Location(l) => l.business_id,
            EntityRecord::Supplier(s) => s.business_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    pub business_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLocation {
    pub name: String,
    pub landmark: String,
    pub location_id: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub business_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub mobile_no: i64,
    pub business_id: i64,
}

/// Validated create payload, serialized as the POST body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EntityDraft {
    Category(NewCategory),
    Location(NewLocation),
    Supplier(NewSupplier),
}

impl EntityDraft {
    pub fn create_path(&self) -> &str {
        match self {
            EntityDraft::Category(_) => EntityKind::Category.create_path(),
            EntityDraft::Location(_) => EntityKind::Location.create_path(),
            EntityDraft::Supplier(_) => EntityKind::Supplier.create_path(),
        }
    }

    /// Tags whose cached lists go stale once this draft is created
    pub fn invalidates(&self) -> &'static [CacheTag] {
        match self {
            EntityDraft::Category(_) => &[CacheTag::Category, CacheTag::Role],
            EntityDraft::Location(_) => &[CacheTag::Location],
            EntityDraft::Supplier(_) => &[CacheTag::Supplier],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplier_mobile_accepts_string_or_number() {
        let as_number: Supplier = serde_json::from_str(
            r#"{"id": 1, "name": "Ali", "mobile_no": 923411415567, "business_id": 3}"#,
        )
        .unwrap();
        let as_text: Supplier = serde_json::from_str(
            r#"{"id": 2, "name": "Sara", "mobile_no": "03001234567", "business_id": 3}"#,
        )
        .unwrap();
        assert_eq!(as_number.mobile_no, "923411415567");
        assert_eq!(as_text.mobile_no, "03001234567");
    }

    #[test]
    fn test_page_size_sentinel() {
        assert_eq!(PageSize::All.as_param(), -1);
        assert_eq!(PageSize::Limit(25).as_param(), 25);
    }

    #[test]
    fn test_category_draft_invalidates_roles_too() {
        let draft = EntityDraft::Category(NewCategory {
            name: "Drinks".to_string(),
            parent_id: None,
            business_id: 1,
        });
        assert_eq!(draft.invalidates(), &[CacheTag::Category, CacheTag::Role]);
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({"name": "Drinks", "business_id": 1})
        );
    }

    #[test]
    fn test_entity_kind_parse() {
        assert_eq!(EntityKind::parse("Suppliers"), Some(EntityKind::Supplier));
        assert_eq!(EntityKind::parse("role"), Some(EntityKind::Role));
        assert_eq!(EntityKind::parse("taxes"), None);
    }
}
