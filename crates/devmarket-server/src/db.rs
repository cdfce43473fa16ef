use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::ApiError;

/// Payment gateway configuration record (full row, admin-side only).
///
/// `secret_key` never leaves the admin surface; the public listing uses
/// [`GatewayInfo`], which has no secret field at all.
#[derive(Debug, Clone)]
pub struct PaymentGateway {
    pub gateway: String,
    pub display_name: String,
    pub description: Option<String>,
    pub is_enabled: bool,
    pub display_order: i64,
    pub public_key: Option<String>,
    pub secret_key: Option<String>,
    pub supported_currencies: Vec<String>,
    pub updated_at: i64,
}

/// Public projection of a gateway config.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayInfo {
    pub gateway: String,
    pub display_name: String,
    pub description: Option<String>,
    pub public_key: Option<String>,
    pub supported_currencies: Vec<String>,
}

/// Request to create or update a gateway config.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertGateway {
    pub gateway: String,
    pub display_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_enabled: bool,
    #[serde(default)]
    pub display_order: i64,
    pub public_key: Option<String>,
    pub secret_key: Option<String>,
    #[serde(default)]
    pub supported_currencies: Vec<String>,
}

/// Donation/checkout landing page record.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPage {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing)]
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub is_public: bool,
    pub view_count: i64,
    pub donation_count: i64,
    pub total_raised: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Contact form submission record.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub category: String,
    pub message: String,
    pub status: String,
    pub created_at: i64,
}

/// Ad/verification vendor record. `config` is a free-form JSON bag
/// maintained by operators; see [`crate::ads`] for how it is read.
#[derive(Debug, Clone)]
pub struct AdVendor {
    pub id: i64,
    pub name: String,
    pub vendor_type: String,
    pub is_active: bool,
    pub config: serde_json::Value,
}

/// Site-wide donation settings.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationSettings {
    pub minimum_amount: f64,
    pub enable_donations: bool,
    pub thank_you_message: String,
}

impl Default for DonationSettings {
    fn default() -> Self {
        Self {
            minimum_amount: 1.0,
            enable_donations: true,
            thank_you_message: "Thank you for your donation!".to_string(),
        }
    }
}

/// SQLite database wrapper
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(path: &str) -> Result<Self, ApiError> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.conn
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))
    }

    fn init_schema(&self) -> Result<(), ApiError> {
        let conn = self.lock()?;

        // Enable WAL mode for better concurrent read/write performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE NOT NULL,
                name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'USER',
                status TEXT NOT NULL DEFAULT 'ACTIVE',
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS payment_gateways (
                gateway TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                description TEXT,
                is_enabled INTEGER NOT NULL DEFAULT 0,
                display_order INTEGER NOT NULL DEFAULT 0,
                public_key TEXT,
                secret_key TEXT,
                supported_currencies TEXT NOT NULL DEFAULT '[]',
                updated_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS payment_pages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug TEXT UNIQUE NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                amount REAL NOT NULL,
                currency TEXT NOT NULL DEFAULT 'USD',
                is_active INTEGER NOT NULL DEFAULT 1,
                is_public INTEGER NOT NULL DEFAULT 1,
                view_count INTEGER NOT NULL DEFAULT 0,
                donation_count INTEGER NOT NULL DEFAULT 0,
                total_raised REAL NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_payment_pages_slug ON payment_pages(slug);

            CREATE TABLE IF NOT EXISTS contacts (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                subject TEXT NOT NULL,
                category TEXT NOT NULL,
                message TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'PENDING',
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS ad_vendors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                vendor_type TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                config TEXT NOT NULL DEFAULT '{}'
            );

            CREATE TABLE IF NOT EXISTS donation_settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                minimum_amount REAL NOT NULL DEFAULT 1,
                enable_donations INTEGER NOT NULL DEFAULT 1,
                thank_you_message TEXT NOT NULL,
                updated_by TEXT
            );
            "#,
        )?;

        Ok(())
    }

    // ---- users ----

    /// Upsert a user credential by email. Returns the user id.
    pub fn upsert_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<i64, ApiError> {
        let conn = self.lock()?;
        let now = chrono::Utc::now().timestamp();

        conn.execute(
            r#"
            INSERT INTO users (email, name, password_hash, role, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, 'ACTIVE', ?5, ?5)
            ON CONFLICT(email) DO UPDATE SET
                password_hash = ?3,
                role = ?4,
                status = 'ACTIVE',
                updated_at = ?5
            "#,
            params![email, name, password_hash, role, now],
        )?;

        let id: i64 = conn.query_row(
            "SELECT id FROM users WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    /// Fetch a user's password hash and role by email.
    pub fn get_user_credential(&self, email: &str) -> Result<Option<(String, String)>, ApiError> {
        let conn = self.lock()?;
        let cred = conn
            .query_row(
                "SELECT password_hash, role FROM users WHERE email = ?1 AND status = 'ACTIVE'",
                params![email],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(cred)
    }

    // ---- payment gateways ----

    /// Create or update a gateway configuration.
    pub fn upsert_gateway(&self, g: &UpsertGateway) -> Result<(), ApiError> {
        let conn = self.lock()?;
        let now = chrono::Utc::now().timestamp();
        let currencies = serde_json::to_string(&g.supported_currencies)
            .map_err(|e| ApiError::Internal(format!("failed to encode currencies: {}", e)))?;

        conn.execute(
            r#"
            INSERT INTO payment_gateways
                (gateway, display_name, description, is_enabled, display_order,
                 public_key, secret_key, supported_currencies, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(gateway) DO UPDATE SET
                display_name = ?2,
                description = ?3,
                is_enabled = ?4,
                display_order = ?5,
                public_key = ?6,
                secret_key = COALESCE(?7, secret_key),
                supported_currencies = ?8,
                updated_at = ?9
            "#,
            params![
                g.gateway,
                g.display_name,
                g.description,
                g.is_enabled as i32,
                g.display_order,
                g.public_key,
                g.secret_key,
                currencies,
                now
            ],
        )?;
        Ok(())
    }

    /// List enabled gateways in display order, projected to public fields.
    ///
    /// The projection is selected column-by-column into [`GatewayInfo`],
    /// which has no secret-key field, so a secret cannot leak through
    /// serialization. Returns an empty vec when nothing is enabled.
    pub fn list_enabled_gateways(&self) -> Result<Vec<GatewayInfo>, ApiError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT gateway, display_name, description, public_key, supported_currencies
            FROM payment_gateways
            WHERE is_enabled = 1
            ORDER BY display_order ASC
            "#,
        )?;

        let gateways = stmt
            .query_map([], |row| {
                let currencies: String = row.get(4)?;
                Ok(GatewayInfo {
                    gateway: row.get(0)?,
                    display_name: row.get(1)?,
                    description: row.get(2)?,
                    public_key: row.get(3)?,
                    supported_currencies: serde_json::from_str(&currencies)
                        .unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(gateways)
    }

    /// List all gateway rows for the admin surface.
    pub fn list_gateways(&self) -> Result<Vec<PaymentGateway>, ApiError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT gateway, display_name, description, is_enabled, display_order,
                   public_key, secret_key, supported_currencies, updated_at
            FROM payment_gateways
            ORDER BY display_order ASC
            "#,
        )?;

        let gateways = stmt
            .query_map([], |row| {
                let currencies: String = row.get(7)?;
                Ok(PaymentGateway {
                    gateway: row.get(0)?,
                    display_name: row.get(1)?,
                    description: row.get(2)?,
                    is_enabled: row.get::<_, i32>(3)? == 1,
                    display_order: row.get(4)?,
                    public_key: row.get(5)?,
                    secret_key: row.get(6)?,
                    supported_currencies: serde_json::from_str(&currencies)
                        .unwrap_or_default(),
                    updated_at: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(gateways)
    }

    // ---- payment pages ----

    /// Insert a new payment page.
    #[allow(clippy::too_many_arguments)]
    pub fn create_page(
        &self,
        slug: &str,
        title: &str,
        description: Option<&str>,
        amount: f64,
        currency: &str,
        is_active: bool,
        is_public: bool,
    ) -> Result<PaymentPage, ApiError> {
        let conn = self.lock()?;
        let now = chrono::Utc::now().timestamp();

        conn.execute(
            r#"
            INSERT INTO payment_pages
                (slug, title, description, amount, currency, is_active, is_public,
                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            "#,
            params![
                slug,
                title,
                description,
                amount,
                currency,
                is_active as i32,
                is_public as i32,
                now
            ],
        )?;

        let id = conn.last_insert_rowid();

        Ok(PaymentPage {
            id,
            slug: slug.to_string(),
            title: title.to_string(),
            description: description.map(String::from),
            amount,
            currency: currency.to_string(),
            is_active,
            is_public,
            view_count: 0,
            donation_count: 0,
            total_raised: 0.0,
            created_at: now,
            updated_at: now,
        })
    }

    /// List payment pages, newest first.
    ///
    /// By default only active, public pages are returned;
    /// `include_inactive` lifts both filters (admin preview).
    pub fn list_pages(&self, include_inactive: bool) -> Result<Vec<PaymentPage>, ApiError> {
        let conn = self.lock()?;
        let sql = if include_inactive {
            r#"
            SELECT id, slug, title, description, amount, currency, is_active, is_public,
                   view_count, donation_count, total_raised, created_at, updated_at
            FROM payment_pages
            ORDER BY created_at DESC, id DESC
            "#
        } else {
            r#"
            SELECT id, slug, title, description, amount, currency, is_active, is_public,
                   view_count, donation_count, total_raised, created_at, updated_at
            FROM payment_pages
            WHERE is_active = 1 AND is_public = 1
            ORDER BY created_at DESC, id DESC
            "#
        };

        let mut stmt = conn.prepare(sql)?;
        let pages = stmt
            .query_map([], map_page_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    /// Get an active, public page by slug.
    pub fn get_page(&self, slug: &str) -> Result<Option<PaymentPage>, ApiError> {
        let conn = self.lock()?;
        let page = conn
            .query_row(
                r#"
                SELECT id, slug, title, description, amount, currency, is_active, is_public,
                       view_count, donation_count, total_raised, created_at, updated_at
                FROM payment_pages
                WHERE slug = ?1 AND is_active = 1 AND is_public = 1
                "#,
                params![slug],
                map_page_row,
            )
            .optional()?;
        Ok(page)
    }

    /// Increment a page's view counter by exactly one.
    ///
    /// Single SQL increment, not read-modify-write, so concurrent
    /// requests cannot lose counts.
    pub fn increment_view_count(&self, id: i64) -> Result<(), ApiError> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE payment_pages SET view_count = view_count + 1 WHERE id = ?1",
            params![id],
        )?;
        if updated == 0 {
            return Err(ApiError::NotFound(format!("payment page {}", id)));
        }
        Ok(())
    }

    /// Record a completed donation against a page.
    /// Called by the donation processor after settlement.
    pub fn record_donation(&self, slug: &str, amount: f64) -> Result<(), ApiError> {
        let conn = self.lock()?;
        let now = chrono::Utc::now().timestamp();
        let updated = conn.execute(
            r#"
            UPDATE payment_pages
            SET donation_count = donation_count + 1,
                total_raised = total_raised + ?2,
                updated_at = ?3
            WHERE slug = ?1
            "#,
            params![slug, amount, now],
        )?;
        if updated == 0 {
            return Err(ApiError::NotFound(format!("payment page '{}'", slug)));
        }
        Ok(())
    }

    // ---- contacts ----

    /// Persist a contact form submission with status PENDING.
    pub fn create_contact(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        category: &str,
        message: &str,
    ) -> Result<Contact, ApiError> {
        let conn = self.lock()?;
        let id = uuid::Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();

        conn.execute(
            r#"
            INSERT INTO contacts (id, name, email, subject, category, message, status, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'PENDING', ?7)
            "#,
            params![id, name, email, subject, category, message, now],
        )?;

        Ok(Contact {
            id,
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            category: category.to_string(),
            message: message.to_string(),
            status: "PENDING".to_string(),
            created_at: now,
        })
    }

    /// List contact submissions, newest first.
    pub fn list_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, name, email, subject, category, message, status, created_at
            FROM contacts
            ORDER BY created_at DESC
            "#,
        )?;

        let contacts = stmt
            .query_map([], |row| {
                Ok(Contact {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    subject: row.get(3)?,
                    category: row.get(4)?,
                    message: row.get(5)?,
                    status: row.get(6)?,
                    created_at: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(contacts)
    }

    /// Count persisted contact submissions.
    pub fn count_contacts(&self) -> Result<i64, ApiError> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count)
    }

    // ---- ad vendors ----

    /// Insert or replace a vendor by name.
    pub fn upsert_vendor(
        &self,
        name: &str,
        vendor_type: &str,
        is_active: bool,
        config: &serde_json::Value,
    ) -> Result<(), ApiError> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO ad_vendors (name, vendor_type, is_active, config)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![name, vendor_type, is_active as i32, config.to_string()],
        )?;
        Ok(())
    }

    /// List active ad vendors.
    pub fn list_active_vendors(&self) -> Result<Vec<AdVendor>, ApiError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, vendor_type, is_active, config FROM ad_vendors WHERE is_active = 1",
        )?;

        let vendors = stmt
            .query_map([], |row| {
                let raw: String = row.get(4)?;
                Ok(AdVendor {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    vendor_type: row.get(2)?,
                    is_active: row.get::<_, i32>(3)? == 1,
                    config: serde_json::from_str(&raw)
                        .unwrap_or(serde_json::Value::Null),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(vendors)
    }

    // ---- donation settings ----

    /// Fetch persisted donation settings, if any row exists.
    pub fn get_donation_settings(&self) -> Result<Option<DonationSettings>, ApiError> {
        let conn = self.lock()?;
        let settings = conn
            .query_row(
                r#"
                SELECT minimum_amount, enable_donations, thank_you_message
                FROM donation_settings
                WHERE id = 1
                "#,
                [],
                |row| {
                    Ok(DonationSettings {
                        minimum_amount: row.get(0)?,
                        enable_donations: row.get::<_, i32>(1)? == 1,
                        thank_you_message: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(settings)
    }

    /// Create or update the single donation settings row.
    pub fn upsert_donation_settings(
        &self,
        settings: &DonationSettings,
        updated_by: Option<&str>,
    ) -> Result<(), ApiError> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO donation_settings (id, minimum_amount, enable_donations, thank_you_message, updated_by)
            VALUES (1, ?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                minimum_amount = ?1,
                enable_donations = ?2,
                thank_you_message = ?3,
                updated_by = ?4
            "#,
            params![
                settings.minimum_amount,
                settings.enable_donations as i32,
                settings.thank_you_message,
                updated_by
            ],
        )?;
        Ok(())
    }
}

fn map_page_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PaymentPage> {
    Ok(PaymentPage {
        id: row.get(0)?,
        slug: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        amount: row.get(4)?,
        currency: row.get(5)?,
        is_active: row.get::<_, i32>(6)? == 1,
        is_public: row.get::<_, i32>(7)? == 1,
        view_count: row.get(8)?,
        donation_count: row.get(9)?,
        total_raised: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}
