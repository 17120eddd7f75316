//! Collection primitives: find / insert / update / delete by equality filter.
//!
//! Functions take a borrowed [`Connection`] so the same primitive works on the
//! locked connection and inside a [`rusqlite::Transaction`].

use propertypros_types::api::Page;
use propertypros_types::models::{Advertisement, Offer, Property, Review, User, WishlistItem};
use propertypros_types::results::{DeleteResult, InsertOneResult, UpdateResult};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, params_from_iter};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Properties,
    Advertisements,
    Wishlist,
    Offers,
    Reviews,
}

impl Collection {
    pub fn table(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Properties => "properties",
            Self::Advertisements => "advertisements",
            Self::Wishlist => "wishlist",
            Self::Offers => "offers",
            Self::Reviews => "reviews",
        }
    }
}

/// A typed document stored in exactly one collection.
pub trait Document: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn id(&self) -> Uuid;
}

macro_rules! document {
    ($ty:ty, $collection:expr) => {
        impl Document for $ty {
            const COLLECTION: Collection = $collection;

            fn id(&self) -> Uuid {
                self.id
            }
        }
    };
}

document!(User, Collection::Users);
document!(Property, Collection::Properties);
document!(Advertisement, Collection::Advertisements);
document!(WishlistItem, Collection::Wishlist);
document!(Offer, Collection::Offers);
document!(Review, Collection::Reviews);

/// Conjunction of exact-match equalities. An empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    id: Option<Uuid>,
    fields: Vec<(&'static str, String)>,
}

impl Filter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self {
            id: Some(id),
            fields: Vec::new(),
        }
    }

    /// `name` must be a top-level camelCase field of the document.
    pub fn field(name: &'static str, value: impl Into<String>) -> Self {
        Self::all().and(name, value)
    }

    pub fn and(mut self, name: &'static str, value: impl Into<String>) -> Self {
        debug_assert!(name.chars().all(|c| c.is_ascii_alphanumeric()));
        self.fields.push((name, value.into()));
        self
    }

    fn where_clause(&self) -> (String, Vec<SqlValue>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();

        if let Some(id) = self.id {
            clauses.push("id = ?".to_string());
            params.push(SqlValue::Text(id.to_string()));
        }
        // The path is inlined so the expression matches the json_extract indexes.
        for (name, value) in &self.fields {
            clauses.push(format!("json_extract(body, '$.{}') = ?", name));
            params.push(SqlValue::Text(value.clone()));
        }

        if clauses.is_empty() {
            (String::new(), params)
        } else {
            (format!("WHERE {}", clauses.join(" AND ")), params)
        }
    }
}

pub fn find<T: Document>(conn: &Connection, filter: &Filter, page: Page) -> Result<Vec<T>, StoreError> {
    let (clause, mut params) = filter.where_clause();
    params.push(SqlValue::Integer(i64::from(page.limit())));
    params.push(SqlValue::Integer(i64::from(page.skip)));

    let sql = format!(
        "SELECT body FROM {} {} ORDER BY rowid LIMIT ? OFFSET ?",
        T::COLLECTION.table(),
        clause
    );
    let mut stmt = conn.prepare(&sql)?;
    let bodies = stmt
        .query_map(params_from_iter(params.iter()), |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    bodies
        .iter()
        .map(|body| serde_json::from_str::<T>(body).map_err(StoreError::from))
        .collect()
}

pub fn find_one<T: Document>(conn: &Connection, filter: &Filter) -> Result<Option<T>, StoreError> {
    let (clause, params) = filter.where_clause();
    let sql = format!(
        "SELECT body FROM {} {} ORDER BY rowid LIMIT 1",
        T::COLLECTION.table(),
        clause
    );

    let body: Option<String> = conn
        .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))
        .optional()?;

    body.map(|b| serde_json::from_str::<T>(&b).map_err(StoreError::from))
        .transpose()
}

pub fn count(conn: &Connection, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
    let (clause, params) = filter.where_clause();
    let sql = format!("SELECT COUNT(*) FROM {} {}", collection.table(), clause);
    let n: i64 = conn.query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))?;
    Ok(n as u64)
}

pub fn insert<T: Document>(conn: &Connection, doc: &T) -> Result<InsertOneResult, StoreError> {
    let id = doc.id();
    let body = serde_json::to_string(doc)?;
    conn.execute(
        &format!("INSERT INTO {} (id, body) VALUES (?1, ?2)", T::COLLECTION.table()),
        (id.to_string(), body),
    )?;
    Ok(InsertOneResult::new(id))
}

/// `$set`-style partial update of the first matching document.
///
/// Each top-level key of `set` replaces the stored key; `_id` is never
/// rewritten. When nothing matches and `upsert` is true, a new document is
/// built from the filter's equalities plus `set`.
pub fn update_one(
    conn: &Connection,
    collection: Collection,
    filter: &Filter,
    set: &Map<String, Value>,
    upsert: bool,
) -> Result<UpdateResult, StoreError> {
    let (clause, params) = filter.where_clause();
    let table = collection.table();
    let sql = format!("SELECT id, body FROM {} {} ORDER BY rowid LIMIT 1", table, clause);

    let existing: Option<(String, String)> = conn
        .query_row(&sql, params_from_iter(params.iter()), |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .optional()?;

    match existing {
        Some((id, body)) => {
            let mut doc: Value = serde_json::from_str(&body)?;
            let obj = doc
                .as_object_mut()
                .ok_or_else(|| StoreError::Corrupt(id.clone()))?;

            let mut modified = false;
            for (key, value) in set {
                if key == "_id" {
                    continue;
                }
                if obj.get(key) != Some(value) {
                    obj.insert(key.clone(), value.clone());
                    modified = true;
                }
            }

            if modified {
                conn.execute(
                    &format!("UPDATE {} SET body = ?1 WHERE id = ?2", table),
                    (doc.to_string(), &id),
                )?;
            }
            Ok(UpdateResult::matched(modified))
        }
        None if upsert => {
            let id = filter.id.unwrap_or_else(Uuid::new_v4);
            let mut obj = Map::new();
            obj.insert("_id".into(), Value::String(id.to_string()));
            for (name, value) in &filter.fields {
                obj.insert((*name).to_string(), Value::String(value.clone()));
            }
            for (key, value) in set {
                if key != "_id" {
                    obj.insert(key.clone(), value.clone());
                }
            }

            conn.execute(
                &format!("INSERT INTO {} (id, body) VALUES (?1, ?2)", table),
                (id.to_string(), Value::Object(obj).to_string()),
            )?;
            Ok(UpdateResult::upserted(id))
        }
        None => Ok(UpdateResult::unmatched()),
    }
}

pub fn delete_one(conn: &Connection, collection: Collection, filter: &Filter) -> Result<DeleteResult, StoreError> {
    let (clause, params) = filter.where_clause();
    let table = collection.table();
    let sql = format!(
        "DELETE FROM {table} WHERE id = (SELECT id FROM {table} {clause} ORDER BY rowid LIMIT 1)"
    );
    let n = conn.execute(&sql, params_from_iter(params.iter()))?;
    Ok(DeleteResult::new(n as u64))
}

pub fn delete_many(conn: &Connection, collection: Collection, filter: &Filter) -> Result<DeleteResult, StoreError> {
    let (clause, params) = filter.where_clause();
    let sql = format!("DELETE FROM {} {}", collection.table(), clause);
    let n = conn.execute(&sql, params_from_iter(params.iter()))?;
    Ok(DeleteResult::new(n as u64))
}

/// Converts a serializable partial update into a `$set` map.
pub fn to_set<T: Serialize>(update: &T) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(update)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidUpdate(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use chrono::Utc;
    use propertypros_types::models::PropertyStatus;
    use serde_json::json;

    fn property(agent_email: &str, title: &str) -> Property {
        Property {
            id: Uuid::new_v4(),
            title: title.into(),
            location: "Dhaka".into(),
            image_url: String::new(),
            agent_name: "Agent".into(),
            agent_email: agent_email.into(),
            agent_image: None,
            price_range: vec![100.0, 200.0],
            description: None,
            status: PropertyStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn find_filters_on_fields_and_pages() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            for i in 0..5 {
                insert(conn, &property("a@x.com", &format!("A{i}")))?;
            }
            insert(conn, &property("b@x.com", "B"))?;

            let all: Vec<Property> = find(conn, &Filter::all(), Page::default())?;
            assert_eq!(all.len(), 6);

            let mine: Vec<Property> = find(conn, &Filter::field("agentEmail", "a@x.com"), Page::default())?;
            assert_eq!(mine.len(), 5);
            assert!(mine.iter().all(|p| p.agent_email == "a@x.com"));

            let page: Vec<Property> = find(
                conn,
                &Filter::field("agentEmail", "a@x.com"),
                Page { limit: 2, skip: 3 },
            )?;
            let titles: Vec<_> = page.iter().map(|p| p.title.as_str()).collect();
            assert_eq!(titles, vec!["A3", "A4"]);

            let both = Filter::field("agentEmail", "a@x.com").and("title", "A1");
            assert_eq!(count(conn, Collection::Properties, &both)?, 1);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn update_one_distinguishes_matched_and_modified() {
        let db = Database::open_in_memory().unwrap();
        let p = property("a@x.com", "A");
        db.with_conn(|conn| {
            insert(conn, &p)?;
            let filter = Filter::by_id(p.id);
            let set = to_set(&json!({ "title": "Renamed" }))?;

            let first = update_one(conn, Collection::Properties, &filter, &set, false)?;
            assert_eq!((first.matched_count, first.modified_count), (1, 1));

            let again = update_one(conn, Collection::Properties, &filter, &set, false)?;
            assert_eq!((again.matched_count, again.modified_count), (1, 0));

            let missing = update_one(conn, Collection::Properties, &Filter::by_id(Uuid::new_v4()), &set, false)?;
            assert_eq!(missing, UpdateResult::unmatched());

            let stored: Property = find_one(conn, &filter)?.unwrap();
            assert_eq!(stored.title, "Renamed");
            assert_eq!(stored.id, p.id);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn update_one_never_rewrites_the_id() {
        let db = Database::open_in_memory().unwrap();
        let p = property("a@x.com", "A");
        db.with_conn(|conn| {
            insert(conn, &p)?;
            let set = to_set(&json!({ "_id": Uuid::new_v4().to_string() }))?;
            let result = update_one(conn, Collection::Properties, &Filter::by_id(p.id), &set, false)?;
            assert_eq!(result.modified_count, 0);
            assert!(find_one::<Property>(conn, &Filter::by_id(p.id))?.is_some());
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn upsert_builds_document_from_filter_and_set() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            let filter = Filter::field("email", "new@x.com");
            let set = to_set(&json!({ "name": "New", "role": "buyer", "status": "None", "timestamp": 1 }))?;

            let result = update_one(conn, Collection::Users, &filter, &set, true)?;
            assert_eq!(result.upserted_count, 1);
            let id = result.upserted_id.unwrap();

            let user: User = find_one(conn, &filter)?.unwrap();
            assert_eq!(user.id, id);
            assert_eq!(user.email, "new@x.com");
            assert_eq!(user.name.as_deref(), Some("New"));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn delete_one_removes_a_single_match() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            insert(conn, &property("a@x.com", "A"))?;
            insert(conn, &property("a@x.com", "B"))?;
            let filter = Filter::field("agentEmail", "a@x.com");

            assert_eq!(delete_one(conn, Collection::Properties, &filter)?.deleted_count, 1);
            assert_eq!(count(conn, Collection::Properties, &filter)?, 1);
            assert_eq!(delete_many(conn, Collection::Properties, &filter)?.deleted_count, 1);
            assert_eq!(delete_one(conn, Collection::Properties, &filter)?.deleted_count, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn to_set_rejects_non_object_updates() {
        let err = to_set(&json!(["title"])).unwrap_err();
        assert!(matches!(err, StoreError::InvalidUpdate(_)));
    }
}
