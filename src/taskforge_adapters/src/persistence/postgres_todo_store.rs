use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};

use taskforge_core::{
    NewTodo, Priority, Tag, TagStore, TagStoreError, Todo, TodoPatch, TodoStore, TodoStoreError,
};

#[derive(Clone)]
pub struct PostgresTodoStore {
    pool: PgPool,
}

impl PostgresTodoStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresTodoStore { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: i64,
    user_id: i64,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: DateTime<Utc>,
    due_date: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    priority: String,
    image_urls: Vec<String>,
    tags: Vec<String>,
}

impl TodoRow {
    fn into_todo(self) -> Result<Todo, TodoStoreError> {
        let priority = self
            .priority
            .parse::<Priority>()
            .map_err(TodoStoreError::UnexpectedError)?;
        Ok(Todo {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            completed: self.completed,
            created_at: self.created_at,
            due_date: self.due_date,
            completed_at: self.completed_at,
            priority,
            image_urls: self.image_urls,
            tags: self.tags,
        })
    }
}

/// Todos joined with their tag names. Append a WHERE clause and keep the
/// trailing GROUP BY.
const TODO_SELECT: &str = r#"
    SELECT t.id, t.user_id, t.title, t.description, t.completed, t.created_at,
           t.due_date, t.completed_at, t.priority, t.image_urls,
           COALESCE(
               array_agg(tg.name ORDER BY tg.name) FILTER (WHERE tg.name IS NOT NULL),
               '{}'
           ) AS tags
    FROM todos t
    LEFT JOIN todo_tags tt ON tt.todo_id = t.id
    LEFT JOIN tags tg ON tg.id = tt.tag_id
"#;

fn unexpected(e: sqlx::Error) -> TodoStoreError {
    TodoStoreError::UnexpectedError(e.to_string())
}

impl PostgresTodoStore {
    async fn fetch_one(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError> {
        sqlx::query_as::<_, TodoRow>(&format!(
            "{TODO_SELECT} WHERE t.id = $1 AND t.user_id = $2 GROUP BY t.id"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(TodoStoreError::TodoNotFound)?
        .into_todo()
    }

    async fn replace_links(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        todo_id: i64,
        tags: &[Tag],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM todo_tags WHERE todo_id = $1")
            .bind(todo_id)
            .execute(&mut **tx)
            .await?;
        for tag in tags {
            sqlx::query("INSERT INTO todo_tags (todo_id, tag_id) VALUES ($1, $2)")
                .bind(todo_id)
                .bind(tag.id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TodoStore for PostgresTodoStore {
    #[tracing::instrument(name = "Listing todos from PostgreSQL", skip_all)]
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Todo>, TodoStoreError> {
        let rows = sqlx::query_as::<_, TodoRow>(&format!(
            "{TODO_SELECT} WHERE t.user_id = $1 GROUP BY t.id ORDER BY t.id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        rows.into_iter().map(TodoRow::into_todo).collect()
    }

    #[tracing::instrument(name = "Retrieving todo from PostgreSQL", skip_all)]
    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError> {
        self.fetch_one(id, user_id).await
    }

    #[tracing::instrument(name = "Creating todo in PostgreSQL", skip_all)]
    async fn create(
        &self,
        user_id: i64,
        todo: NewTodo,
        tags: &[Tag],
    ) -> Result<Todo, TodoStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
                INSERT INTO todos (user_id, title, description, due_date, priority, image_urls)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&todo.title)
        .bind(&todo.description)
        .bind(todo.due_date)
        .bind(todo.priority.unwrap_or_default().as_str())
        .bind(&todo.image_urls)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?;

        Self::replace_links(&mut tx, id, tags)
            .await
            .map_err(unexpected)?;
        tx.commit().await.map_err(unexpected)?;

        self.fetch_one(id, user_id).await
    }

    #[tracing::instrument(name = "Updating todo in PostgreSQL", skip_all)]
    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: TodoPatch,
        tags: Option<&[Tag]>,
    ) -> Result<Todo, TodoStoreError> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let result = sqlx::query(
            r#"
                UPDATE todos
                SET title = COALESCE($3, title),
                    description = COALESCE($4, description),
                    completed = COALESCE($5, completed),
                    due_date = COALESCE($6, due_date),
                    priority = COALESCE($7, priority),
                    image_urls = COALESCE($8, image_urls)
                WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.completed)
        .bind(patch.due_date)
        .bind(patch.priority.map(|p| p.as_str()))
        .bind(&patch.image_urls)
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(TodoStoreError::TodoNotFound);
        }

        if let Some(tags) = tags {
            Self::replace_links(&mut tx, id, tags)
                .await
                .map_err(unexpected)?;
        }
        tx.commit().await.map_err(unexpected)?;

        self.fetch_one(id, user_id).await
    }

    #[tracing::instrument(name = "Deleting todo from PostgreSQL", skip_all)]
    async fn delete(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError> {
        let todo = self.fetch_one(id, user_id).await?;
        sqlx::query("DELETE FROM todos WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(todo)
    }

    #[tracing::instrument(name = "Completing todo in PostgreSQL", skip_all)]
    async fn mark_complete(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError> {
        let result = sqlx::query(
            r#"
                UPDATE todos
                SET completed = TRUE, completed_at = $3
                WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(TodoStoreError::TodoNotFound);
        }
        self.fetch_one(id, user_id).await
    }

    #[tracing::instrument(name = "Listing todos by tag from PostgreSQL", skip_all)]
    async fn list_by_tag(&self, tag_id: i64, user_id: i64) -> Result<Vec<Todo>, TodoStoreError> {
        let rows = sqlx::query_as::<_, TodoRow>(&format!(
            r#"
                {TODO_SELECT}
                WHERE t.user_id = $1
                  AND t.id IN (SELECT todo_id FROM todo_tags WHERE tag_id = $2)
                GROUP BY t.id
                ORDER BY t.id
            "#
        ))
        .bind(user_id)
        .bind(tag_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        rows.into_iter().map(TodoRow::into_todo).collect()
    }
}

#[derive(Clone)]
pub struct PostgresTagStore {
    pool: PgPool,
}

impl PostgresTagStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresTagStore { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TagRow {
    id: i64,
    user_id: i64,
    name: String,
    created_at: DateTime<Utc>,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

fn tag_unexpected(e: sqlx::Error) -> TagStoreError {
    TagStoreError::UnexpectedError(e.to_string())
}

#[async_trait]
impl TagStore for PostgresTagStore {
    #[tracing::instrument(name = "Listing tags from PostgreSQL", skip_all)]
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Tag>, TagStoreError> {
        let rows = sqlx::query_as::<_, TagRow>(
            "SELECT id, user_id, name, created_at FROM tags WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(tag_unexpected)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    #[tracing::instrument(name = "Retrieving tag from PostgreSQL", skip_all)]
    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Tag, TagStoreError> {
        sqlx::query_as::<_, TagRow>(
            "SELECT id, user_id, name, created_at FROM tags WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(tag_unexpected)?
        .map(Tag::from)
        .ok_or(TagStoreError::TagNotFound)
    }

    #[tracing::instrument(name = "Retrieving tag by name from PostgreSQL", skip_all)]
    async fn find_by_name(&self, name: &str, user_id: i64) -> Result<Tag, TagStoreError> {
        sqlx::query_as::<_, TagRow>(
            "SELECT id, user_id, name, created_at FROM tags WHERE name = $1 AND user_id = $2",
        )
        .bind(name)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(tag_unexpected)?
        .map(Tag::from)
        .ok_or(TagStoreError::TagNotFound)
    }

    #[tracing::instrument(name = "Finding or creating tag in PostgreSQL", skip_all)]
    async fn find_or_create(&self, name: &str, user_id: i64) -> Result<Tag, TagStoreError> {
        // The no-op DO UPDATE makes RETURNING yield the existing row on
        // conflict.
        let row = sqlx::query_as::<_, TagRow>(
            r#"
                INSERT INTO tags (name, user_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(tag_unexpected)?;
        Ok(row.into())
    }

    #[tracing::instrument(name = "Creating tag in PostgreSQL", skip_all)]
    async fn create(&self, name: &str, user_id: i64) -> Result<Tag, TagStoreError> {
        let row = sqlx::query_as::<_, TagRow>(
            r#"
                INSERT INTO tags (name, user_id)
                VALUES ($1, $2)
                RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint().is_some() {
                    return TagStoreError::TagExists;
                }
            }
            tag_unexpected(e)
        })?;
        Ok(row.into())
    }

    #[tracing::instrument(name = "Deleting tag from PostgreSQL", skip_all)]
    async fn delete(&self, id: i64, user_id: i64) -> Result<Tag, TagStoreError> {
        sqlx::query_as::<_, TagRow>(
            r#"
                DELETE FROM tags
                WHERE id = $1 AND user_id = $2
                RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(tag_unexpected)?
        .map(Tag::from)
        .ok_or(TagStoreError::TagNotFound)
    }
}
