/// Store backed by the hosted relational REST API (PostgREST dialect).
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::errors::{StoreError, StoreResult};
use crate::ids;
use crate::schema::{keys, schema_for};
use crate::types::{Fields, Record, RecordKind, fields_to_json};

use super::Store;

pub struct RestStore {
    base_url: String,
    key: String,
    client: Client,
}

impl RestStore {
    pub fn new(url: &str, key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            key: key.to_string(),
            client,
        }
    }

    fn endpoint(&self, kind: RecordKind) -> String {
        table_endpoint(&self.base_url, kind)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.key)
            .header(AUTHORIZATION, format!("Bearer {}", self.key))
    }
}

pub(crate) fn table_endpoint(base_url: &str, kind: RecordKind) -> String {
    format!("{base_url}/rest/v1/{}", schema_for(kind).table)
}

/// Sends the request and turns non-success statuses into `Rejected`.
fn send(request: RequestBuilder) -> StoreResult<Response> {
    let response = request
        .send()
        .map_err(|err| StoreError::Transport(err.to_string()))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message: response.text().unwrap_or_default(),
    })
}

fn read_json(response: Response) -> StoreResult<Value> {
    response
        .json::<Value>()
        .map_err(|err| StoreError::Transport(err.to_string()))
}

/// Insert payload. The backend tables have no id default, so the id is
/// generated here.
pub(crate) fn insert_body(fields: &Fields) -> Value {
    let mut body = fields_to_json(fields);
    if let Value::Object(object) = &mut body {
        object.insert(keys::ID.to_string(), Value::String(ids::generate()));
    }
    body
}

/// Decode a PostgREST result array.
pub(crate) fn decode_records(body: &Value) -> StoreResult<Vec<Record>> {
    let Value::Array(rows) = body else {
        return Err(StoreError::Malformed(format!("expected an array, got {body}")));
    };
    rows.iter().map(Record::from_json).collect()
}

impl Store for RestStore {
    fn list(&self, kind: RecordKind) -> StoreResult<Vec<Record>> {
        debug!(%kind, "listing records");
        let request = self
            .request(Method::GET, &self.endpoint(kind))
            .query(&[("select", "*")]);
        decode_records(&read_json(send(request)?)?)
    }

    fn create(&self, kind: RecordKind, fields: &Fields) -> StoreResult<Record> {
        let request = self
            .request(Method::POST, &self.endpoint(kind))
            .header("Prefer", "return=representation")
            .json(&insert_body(fields));
        decode_records(&read_json(send(request)?)?)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Malformed("insert returned no record".to_string()))
    }

    fn update(&self, kind: RecordKind, id: &str, fields: &Fields) -> StoreResult<Record> {
        let request = self
            .request(Method::PATCH, &self.endpoint(kind))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&fields_to_json(fields));
        decode_records(&read_json(send(request)?)?)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound {
                kind,
                id: id.to_string(),
            })
    }

    fn delete(&self, kind: RecordKind, id: &str) -> StoreResult<()> {
        let request = self
            .request(Method::DELETE, &self.endpoint(kind))
            .query(&[("id", format!("eq.{id}"))]);
        send(request)?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("remote {}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoints_use_backend_table_names() {
        let store = RestStore::new("https://example.supabase.co/", "key");
        assert_eq!(
            store.endpoint(RecordKind::Staff),
            "https://example.supabase.co/rest/v1/personal"
        );
        assert_eq!(
            table_endpoint("http://localhost", RecordKind::Shift),
            "http://localhost/rest/v1/schichtplanung"
        );
    }

    #[test]
    fn result_arrays_decode_into_records() {
        let body = json!([
            { "id": "a", "abschnitt": "Abschnitt 1", "beschreibung": null },
            { "id": "b", "abschnitt": "Abschnitt 2", "beschreibung": "Nord" }
        ]);
        let records = decode_records(&body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text("beschreibung"), "Nord");
        assert!(decode_records(&json!({ "message": "nope" })).is_err());
    }

    #[test]
    fn inserts_carry_a_client_id() {
        let fields = Fields::from([(
            keys::SECTION_NAME.to_string(),
            crate::types::FieldValue::text("Abschnitt 9"),
        )]);
        let body = insert_body(&fields);
        let id = body[keys::ID].as_str().unwrap();
        assert!(ids::is_valid(id));
        assert_eq!(body[keys::SECTION_NAME], "Abschnitt 9");
    }
}
