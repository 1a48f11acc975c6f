//! MongoDB backend.

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::{ClientOptions, ReadPreference, SelectionCriteria, Tls, TlsOptions};
use mongodb::{Client, Collection};
use rustls::RootCertStore;
use rustls::pki_types::CertificateDer;
use rustls::pki_types::pem::PemObject;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use super::{Note, RecordKey, StoreError, StoreResult, Storer};

pub(crate) const DATABASE: &str = "notes";
pub(crate) const COLLECTION: &str = "notes";

const CA_STEP: &str = "appending certs from pem";

/// Shape of a note in the `notes` collection.
#[derive(Debug, Serialize, Deserialize)]
struct NoteDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    uuid: String,
    body: String,
}

impl From<NoteDocument> for Note {
    fn from(doc: NoteDocument) -> Self {
        Self {
            key: doc.id.map(|id| RecordKey::new(id.to_hex())),
            uuid: doc.uuid,
            body: doc.body,
            ..Self::default()
        }
    }
}

/// Note store backed by a MongoDB client.
#[derive(Debug)]
pub struct MongoStore {
    client: Client,
    notes: Collection<NoteDocument>,
    // The driver reads the CA bundle from a path; the file must outlive the
    // client.
    _ca_file: Option<NamedTempFile>,
}

impl MongoStore {
    /// Connect to the cluster, optionally trusting only the given PEM CA
    /// bundle, and verify the primary answers a ping.
    #[instrument(skip_all)]
    pub async fn connect(connection: &str, ca_bundle: Option<&str>) -> StoreResult<Self> {
        let ca_file = match ca_bundle.filter(|ca| !ca.trim().is_empty()) {
            Some(pem) => {
                let certs = load_ca_bundle(pem)?;
                debug!(certificates = certs.len(), "loaded CA bundle");
                Some(write_ca_file(&certs)?)
            }
            None => None,
        };

        let mut options = ClientOptions::parse(connection)
            .await
            .map_err(StoreError::connection("client creation failed"))?;

        if let Some(file) = &ca_file {
            let mut tls = TlsOptions::default();
            tls.ca_file_path = Some(file.path().to_path_buf());
            options.tls = Some(Tls::Enabled(tls));
        }

        let client = Client::with_options(options)
            .map_err(StoreError::connection("connection failed"))?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary))
            .await
            .map_err(StoreError::connection("ping failed"))?;

        let notes = client.database(DATABASE).collection(COLLECTION);

        Ok(Self {
            client,
            notes,
            _ca_file: ca_file,
        })
    }
}

/// Parse a PEM bundle, keeping the certificates usable as trust anchors.
///
/// Blocks that fail to parse are skipped; the bundle is rejected only when no
/// certificate could be added.
pub(crate) fn load_ca_bundle(pem: &str) -> StoreResult<Vec<CertificateDer<'static>>> {
    let mut roots = RootCertStore::empty();
    let mut accepted = Vec::new();
    for cert in CertificateDer::pem_slice_iter(pem.as_bytes()) {
        let Ok(cert) = cert else {
            break;
        };
        // Not a usable trust anchor; keep looking.
        if roots.add(cert.clone()).is_ok() {
            accepted.push(cert);
        }
    }

    if accepted.is_empty() {
        return Err(StoreError::Connection {
            step: CA_STEP,
            source: None,
        });
    }
    Ok(accepted)
}

/// PEM-encode certificates for the driver's CA file.
pub(crate) fn encode_pem(certs: &[CertificateDer<'_>]) -> String {
    let mut pem = String::new();
    for cert in certs {
        let encoded = STANDARD.encode(cert.as_ref());
        pem.push_str("-----BEGIN CERTIFICATE-----\n");
        for line in encoded.as_bytes().chunks(64) {
            pem.push_str(&String::from_utf8_lossy(line));
            pem.push('\n');
        }
        pem.push_str("-----END CERTIFICATE-----\n");
    }
    pem
}

fn write_ca_file(certs: &[CertificateDer<'_>]) -> StoreResult<NamedTempFile> {
    let mut file = NamedTempFile::new().map_err(StoreError::connection(CA_STEP))?;
    file.write_all(encode_pem(certs).as_bytes())
        .and_then(|_| file.flush())
        .map_err(StoreError::connection(CA_STEP))?;
    Ok(file)
}

impl Storer for MongoStore {
    async fn get(&self, uuid: &str) -> StoreResult<Note> {
        let found = self
            .notes
            .find_one(doc! { "uuid": uuid })
            .await
            .map_err(StoreError::operation("getting note from db"))?;

        found
            .map(Note::from)
            .ok_or_else(|| StoreError::not_found(uuid))
    }

    async fn create(&self, note: &Note) -> StoreResult<()> {
        let document = NoteDocument {
            id: None,
            uuid: note.uuid.clone(),
            body: note.body.clone(),
        };

        self.notes
            .insert_one(document)
            .await
            .map_err(StoreError::operation("creating note in db"))?;

        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        self.client.clone().shutdown().await;
        Ok(())
    }
}
