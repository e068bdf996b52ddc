use taskforge_core::{
    NewTodo, Tag, TagStore, TagStoreError, TagWithCount, Todo, TodoPatch, TodoStore,
    TodoStoreError,
};

/// Error types for the todo/tag service
#[derive(Debug, thiserror::Error)]
pub enum TodoServiceError {
    #[error("Todo not found")]
    TodoNotFound,
    #[error("Tag not found")]
    TagNotFound,
    #[error("Tag already exists")]
    TagExists,
    #[error("Tag is still used by {0} todos")]
    TagInUse(usize),
    #[error("Todo store error: {0}")]
    TodoStoreError(TodoStoreError),
    #[error("Tag store error: {0}")]
    TagStoreError(TagStoreError),
}

impl From<TodoStoreError> for TodoServiceError {
    fn from(e: TodoStoreError) -> Self {
        match e {
            TodoStoreError::TodoNotFound => TodoServiceError::TodoNotFound,
            other => TodoServiceError::TodoStoreError(other),
        }
    }
}

impl From<TagStoreError> for TodoServiceError {
    fn from(e: TagStoreError) -> Self {
        match e {
            TagStoreError::TagNotFound => TodoServiceError::TagNotFound,
            TagStoreError::TagExists => TodoServiceError::TagExists,
            other => TodoServiceError::TagStoreError(other),
        }
    }
}

/// Todo service - user-scoped task and tag CRUD. Plain persistence mapping
/// with ownership filters; tag names are resolved (find-or-create) before
/// they reach the todo store.
pub struct TodoService<T, G>
where
    T: TodoStore,
    G: TagStore,
{
    todo_store: T,
    tag_store: G,
}

impl<T, G> TodoService<T, G>
where
    T: TodoStore,
    G: TagStore,
{
    pub fn new(todo_store: T, tag_store: G) -> Self {
        Self {
            todo_store,
            tag_store,
        }
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<Todo>, TodoServiceError> {
        Ok(self.todo_store.list_for_user(user_id).await?)
    }

    pub async fn get(&self, id: i64, user_id: i64) -> Result<Todo, TodoServiceError> {
        Ok(self.todo_store.find_for_user(id, user_id).await?)
    }

    #[tracing::instrument(name = "TodoService::create", skip_all, fields(user_id))]
    pub async fn create(&self, user_id: i64, todo: NewTodo) -> Result<Todo, TodoServiceError> {
        let tags = self.resolve_tags(&todo.tags, user_id).await?;
        Ok(self.todo_store.create(user_id, todo, &tags).await?)
    }

    #[tracing::instrument(name = "TodoService::update", skip_all, fields(id, user_id))]
    pub async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: TodoPatch,
    ) -> Result<Todo, TodoServiceError> {
        let tags = match &patch.tags {
            Some(names) => Some(self.resolve_tags(names, user_id).await?),
            None => None,
        };
        Ok(self
            .todo_store
            .update(id, user_id, patch, tags.as_deref())
            .await?)
    }

    pub async fn remove(&self, id: i64, user_id: i64) -> Result<Todo, TodoServiceError> {
        Ok(self.todo_store.delete(id, user_id).await?)
    }

    pub async fn complete(&self, id: i64, user_id: i64) -> Result<Todo, TodoServiceError> {
        Ok(self.todo_store.mark_complete(id, user_id).await?)
    }

    /// Todos carrying the named tag; an unknown tag is just an empty list.
    pub async fn find_by_tag(
        &self,
        tag_name: &str,
        user_id: i64,
    ) -> Result<Vec<Todo>, TodoServiceError> {
        let tag = match self.tag_store.find_by_name(tag_name, user_id).await {
            Ok(tag) => tag,
            Err(TagStoreError::TagNotFound) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(self.todo_store.list_by_tag(tag.id, user_id).await?)
    }

    pub async fn all_tags(&self, user_id: i64) -> Result<Vec<TagWithCount>, TodoServiceError> {
        let tags = self.tag_store.list_for_user(user_id).await?;
        let mut result = Vec::with_capacity(tags.len());
        for tag in tags {
            let todos = self.todo_store.list_by_tag(tag.id, user_id).await?;
            result.push(TagWithCount {
                id: tag.id,
                name: tag.name,
                count: todos.len(),
            });
        }
        Ok(result)
    }

    pub async fn used_tags(&self, user_id: i64) -> Result<Vec<TagWithCount>, TodoServiceError> {
        Ok(self
            .all_tags(user_id)
            .await?
            .into_iter()
            .filter(|t| t.count > 0)
            .collect())
    }

    pub async fn unused_tags(&self, user_id: i64) -> Result<Vec<TagWithCount>, TodoServiceError> {
        Ok(self
            .all_tags(user_id)
            .await?
            .into_iter()
            .filter(|t| t.count == 0)
            .collect())
    }

    pub async fn create_tag(
        &self,
        name: &str,
        user_id: i64,
    ) -> Result<TagWithCount, TodoServiceError> {
        let tag = self.tag_store.create(name, user_id).await?;
        Ok(TagWithCount {
            id: tag.id,
            name: tag.name,
            count: 0,
        })
    }

    #[tracing::instrument(name = "TodoService::delete_tag", skip_all, fields(id, user_id))]
    pub async fn delete_tag(&self, id: i64, user_id: i64) -> Result<Tag, TodoServiceError> {
        let tag = self.tag_store.find_for_user(id, user_id).await?;
        let in_use = self.todo_store.list_by_tag(tag.id, user_id).await?.len();
        if in_use > 0 {
            return Err(TodoServiceError::TagInUse(in_use));
        }
        Ok(self.tag_store.delete(tag.id, user_id).await?)
    }

    pub async fn delete_tag_by_name(
        &self,
        name: &str,
        user_id: i64,
    ) -> Result<Tag, TodoServiceError> {
        let tag = self.tag_store.find_by_name(name, user_id).await?;
        self.delete_tag(tag.id, user_id).await
    }

    async fn resolve_tags(
        &self,
        names: &[String],
        user_id: i64,
    ) -> Result<Vec<Tag>, TodoServiceError> {
        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            tags.push(self.tag_store.find_or_create(name, user_id).await?);
        }
        Ok(tags)
    }
}
