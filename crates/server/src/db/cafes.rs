//! Cafe repository for database operations.
//!
//! Listing queries are composed at runtime with `QueryBuilder` since the
//! filter decides which columns take part in the `WHERE` clause. Every listing
//! is ordered by ascending id.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use cafe_catalog_core::{Cafe, CafeFilter, CafeId, LocationSelection, NewCafe};

use super::RepositoryError;

/// Column list shared by every cafe query.
const CAFE_COLUMNS: &str = "id, name, map_url, img_url, location, seats, \
                            has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price";

/// Repository for cafe database operations.
pub struct CafeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CafeRepository<'a> {
    /// Create a new cafe repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a cafe and return its freshly assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(&self, cafe: &NewCafe) -> Result<CafeId, RepositoryError> {
        let result = sqlx::query(
            r"
            INSERT INTO cafe (
                name, map_url, img_url, location, seats,
                has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&cafe.name)
        .bind(&cafe.map_url)
        .bind(&cafe.img_url)
        .bind(&cafe.location)
        .bind(&cafe.seats)
        .bind(cafe.has_toilet)
        .bind(cafe.has_wifi)
        .bind(cafe.has_sockets)
        .bind(cafe.can_take_calls)
        .bind(cafe.coffee_price.as_deref())
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "a cafe named '{}' already exists",
                    cafe.name
                ));
            }
            RepositoryError::Database(e)
        })?;

        Ok(CafeId::new(result.last_insert_rowid()))
    }

    /// Get a cafe by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CafeId) -> Result<Option<Cafe>, RepositoryError> {
        let cafe = sqlx::query_as::<_, Cafe>(&format!(
            "SELECT {CAFE_COLUMNS} FROM cafe WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(cafe)
    }

    /// Delete a cafe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cafe doesn't exist.
    pub async fn delete(&self, id: CafeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cafe WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Replace a cafe's coffee price. `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cafe doesn't exist.
    pub async fn update_price(
        &self,
        id: CafeId,
        coffee_price: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE cafe SET coffee_price = ? WHERE id = ?")
            .bind(coffee_price)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// List the cafes matching a filter, ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &CafeFilter) -> Result<Vec<Cafe>, RepositoryError> {
        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {CAFE_COLUMNS} FROM cafe WHERE 1 = 1"));

        if let LocationSelection::RestrictTo(locations) = filter.locations() {
            query.push(" AND location IN (");
            let mut separated = query.separated(", ");
            for location in locations {
                separated.push_bind(location.clone());
            }
            separated.push_unseparated(")");
        }

        for &(amenity, value) in filter.amenities() {
            query
                .push(" AND ")
                .push(amenity.column())
                .push(" = ")
                .push_bind(value);
        }

        query.push(" ORDER BY id");

        let cafes = query.build_query_as::<Cafe>().fetch_all(self.pool).await?;
        Ok(cafes)
    }

    /// List the cafes in exactly this location (case-sensitive), ordered by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_location(&self, location: &str) -> Result<Vec<Cafe>, RepositoryError> {
        let cafes = sqlx::query_as::<_, Cafe>(&format!(
            "SELECT {CAFE_COLUMNS} FROM cafe WHERE location = ? ORDER BY id"
        ))
        .bind(location)
        .fetch_all(self.pool)
        .await?;

        Ok(cafes)
    }

    /// Count stored cafes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cafe")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Distinct locations across the current cafes, sorted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn distinct_locations(&self) -> Result<Vec<String>, RepositoryError> {
        let locations: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT location FROM cafe ORDER BY location")
                .fetch_all(self.pool)
                .await?;

        Ok(locations)
    }
}
