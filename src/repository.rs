use crate::{
    error::AppError,
    models::{CreateOfficeRequest, CreateStaffRequest, Message, Office, Staff, StaffRole},
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, PgPool};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Repository Trait
///
/// The abstract contract for all persistence operations. Handlers and the auth
/// extractor talk to this trait, never to a concrete database, so the whole HTTP
/// surface can run against `PostgresRepository` in production and
/// `MemoryRepository` in tests.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) shareable across axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Staff / Auth ---
    /// Resolves a staff member by id. Used by the auth extractor; read-only,
    /// so resolving the same credential twice yields the same record.
    async fn get_staff_member(&self, id: Uuid) -> Result<Option<Staff>, AppError>;
    /// The full staff directory.
    async fn list_staff(&self) -> Result<Vec<Staff>, AppError>;
    /// Inserts a staff record. A duplicate username is a `Conflict`.
    async fn create_staff(&self, req: CreateStaffRequest) -> Result<Staff, AppError>;

    // --- Offices ---
    async fn list_offices(&self) -> Result<Vec<Office>, AppError>;
    async fn get_office(&self, id: Uuid) -> Result<Option<Office>, AppError>;
    async fn create_office(&self, req: CreateOfficeRequest) -> Result<Office, AppError>;

    // --- Message Log ---
    /// Message log entries in insertion order.
    async fn list_messages(&self) -> Result<Vec<Message>, AppError>;
    /// Appends a fully-formed message (timestamp and attribution already set).
    async fn record_message(&self, message: Message) -> Result<Message, AppError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The production implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw `staff` row. The role column is TEXT in the database and converted to the
/// `StaffRole` enum on the way out; an unknown value is a data-integrity failure.
#[derive(FromRow)]
struct StaffRow {
    id: Uuid,
    username: String,
    email: String,
    role: String,
}

impl StaffRow {
    fn into_staff(self) -> Result<Staff, AppError> {
        let role = StaffRole::parse(&self.role).ok_or_else(|| {
            tracing::error!("staff {} has unknown role {:?}", self.id, self.role);
            AppError::internal("corrupt staff record")
        })?;
        Ok(Staff {
            id: self.id,
            username: self.username,
            email: self.email,
            role,
        })
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_staff_member(&self, id: Uuid) -> Result<Option<Staff>, AppError> {
        let row = sqlx::query_as::<_, StaffRow>(
            "SELECT id, username, email, role FROM staff WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(StaffRow::into_staff).transpose()
    }

    async fn list_staff(&self) -> Result<Vec<Staff>, AppError> {
        let rows = sqlx::query_as::<_, StaffRow>(
            "SELECT id, username, email, role FROM staff ORDER BY username ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(StaffRow::into_staff).collect()
    }

    async fn create_staff(&self, req: CreateStaffRequest) -> Result<Staff, AppError> {
        // The unique index on staff.username turns a duplicate into a database
        // error; map it to a 409 instead of a generic 500.
        let row = sqlx::query_as::<_, StaffRow>(
            r#"
            INSERT INTO staff (id, username, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, role
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.username)
        .bind(&req.email)
        .bind(req.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict(format!("username {:?} already exists", req.username))
            }
            _ => AppError::from(e),
        })?;

        row.into_staff()
    }

    async fn list_offices(&self) -> Result<Vec<Office>, AppError> {
        let offices = sqlx::query_as::<_, Office>(
            "SELECT id, name, location, capacity, created_at FROM offices ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(offices)
    }

    async fn get_office(&self, id: Uuid) -> Result<Option<Office>, AppError> {
        let office = sqlx::query_as::<_, Office>(
            "SELECT id, name, location, capacity, created_at FROM offices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(office)
    }

    async fn create_office(&self, req: CreateOfficeRequest) -> Result<Office, AppError> {
        let office = sqlx::query_as::<_, Office>(
            r#"
            INSERT INTO offices (id, name, location, capacity, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING id, name, location, capacity, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(&req.location)
        .bind(req.capacity)
        .fetch_one(&self.pool)
        .await?;
        Ok(office)
    }

    async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        let messages = sqlx::query_as::<_, Message>(
            // The timestamp column is TEXT (RFC 3339), which sorts correctly.
            "SELECT timestamp, message, staff_username FROM staff_messages ORDER BY timestamp ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }

    async fn record_message(&self, message: Message) -> Result<Message, AppError> {
        sqlx::query(
            "INSERT INTO staff_messages (timestamp, message, staff_username) VALUES ($1, $2, $3)",
        )
        .bind(&message.timestamp)
        .bind(&message.message)
        .bind(&message.staff_username)
        .execute(&self.pool)
        .await?;
        Ok(message)
    }
}

/// MemoryRepository
///
/// In-memory implementation used by the integration tests and local
/// experiments. Plain `RwLock`s suffice here: every critical section is a
/// short, non-awaiting vector operation.
#[derive(Default)]
pub struct MemoryRepository {
    staff: RwLock<Vec<Staff>>,
    offices: RwLock<Vec<Office>>,
    messages: RwLock<Vec<Message>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a staff record directly, the in-memory analogue of inserting a row
    /// before a test run.
    pub fn seed_staff(&self, staff: Staff) {
        self.staff.write().expect("staff lock poisoned").push(staff);
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn get_staff_member(&self, id: Uuid) -> Result<Option<Staff>, AppError> {
        let staff = self.staff.read().expect("staff lock poisoned");
        Ok(staff.iter().find(|s| s.id == id).cloned())
    }

    async fn list_staff(&self) -> Result<Vec<Staff>, AppError> {
        let mut all = self.staff.read().expect("staff lock poisoned").clone();
        all.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(all)
    }

    async fn create_staff(&self, req: CreateStaffRequest) -> Result<Staff, AppError> {
        let mut staff = self.staff.write().expect("staff lock poisoned");
        if staff.iter().any(|s| s.username == req.username) {
            return Err(AppError::conflict(format!(
                "username {:?} already exists",
                req.username
            )));
        }
        let record = Staff {
            id: Uuid::new_v4(),
            username: req.username,
            email: req.email,
            role: req.role,
        };
        staff.push(record.clone());
        Ok(record)
    }

    async fn list_offices(&self) -> Result<Vec<Office>, AppError> {
        let mut all = self.offices.read().expect("offices lock poisoned").clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn get_office(&self, id: Uuid) -> Result<Option<Office>, AppError> {
        let offices = self.offices.read().expect("offices lock poisoned");
        Ok(offices.iter().find(|o| o.id == id).cloned())
    }

    async fn create_office(&self, req: CreateOfficeRequest) -> Result<Office, AppError> {
        let office = Office {
            id: Uuid::new_v4(),
            name: req.name,
            location: req.location,
            capacity: req.capacity,
            created_at: Utc::now(),
        };
        self.offices
            .write()
            .expect("offices lock poisoned")
            .push(office.clone());
        Ok(office)
    }

    async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        Ok(self.messages.read().expect("messages lock poisoned").clone())
    }

    async fn record_message(&self, message: Message) -> Result<Message, AppError> {
        self.messages
            .write()
            .expect("messages lock poisoned")
            .push(message.clone());
        Ok(message)
    }
}
