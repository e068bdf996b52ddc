use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use taskforge_core::{
    NewTodo, Tag, TagStore, TagStoreError, Todo, TodoPatch, TodoStore, TodoStoreError,
};

#[derive(Clone)]
struct TodoRecord {
    todo: Todo,
    tag_ids: Vec<i64>,
}

/// In-memory todo store.
#[derive(Clone, Default)]
pub struct HashMapTodoStore {
    todos: Arc<RwLock<HashMap<i64, TodoRecord>>>,
    next_id: Arc<AtomicI64>,
}

impl HashMapTodoStore {
    pub fn new() -> Self {
        Self {
            todos: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

#[async_trait]
impl TodoStore for HashMapTodoStore {
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Todo>, TodoStoreError> {
        let mut todos: Vec<Todo> = self
            .todos
            .read()
            .await
            .values()
            .filter(|r| r.todo.user_id == user_id)
            .map(|r| r.todo.clone())
            .collect();
        todos.sort_by_key(|t| t.id);
        Ok(todos)
    }

    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError> {
        self.todos
            .read()
            .await
            .get(&id)
            .filter(|r| r.todo.user_id == user_id)
            .map(|r| r.todo.clone())
            .ok_or(TodoStoreError::TodoNotFound)
    }

    async fn create(
        &self,
        user_id: i64,
        todo: NewTodo,
        tags: &[Tag],
    ) -> Result<Todo, TodoStoreError> {
        let mut todos = self.todos.write().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = TodoRecord {
            todo: Todo {
                id,
                user_id,
                title: todo.title,
                description: todo.description,
                completed: false,
                created_at: Utc::now(),
                due_date: todo.due_date,
                completed_at: None,
                priority: todo.priority.unwrap_or_default(),
                image_urls: todo.image_urls,
                tags: tags.iter().map(|t| t.name.clone()).collect(),
            },
            tag_ids: tags.iter().map(|t| t.id).collect(),
        };
        todos.insert(id, record.clone());
        Ok(record.todo)
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: TodoPatch,
        tags: Option<&[Tag]>,
    ) -> Result<Todo, TodoStoreError> {
        let mut todos = self.todos.write().await;
        let record = todos
            .get_mut(&id)
            .filter(|r| r.todo.user_id == user_id)
            .ok_or(TodoStoreError::TodoNotFound)?;
        if let Some(title) = patch.title {
            record.todo.title = title;
        }
        if let Some(description) = patch.description {
            record.todo.description = Some(description);
        }
        if let Some(completed) = patch.completed {
            record.todo.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            record.todo.due_date = Some(due_date);
        }
        if let Some(priority) = patch.priority {
            record.todo.priority = priority;
        }
        if let Some(image_urls) = patch.image_urls {
            record.todo.image_urls = image_urls;
        }
        if let Some(tags) = tags {
            record.todo.tags = tags.iter().map(|t| t.name.clone()).collect();
            record.tag_ids = tags.iter().map(|t| t.id).collect();
        }
        Ok(record.todo.clone())
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError> {
        let mut todos = self.todos.write().await;
        if !todos.get(&id).is_some_and(|r| r.todo.user_id == user_id) {
            return Err(TodoStoreError::TodoNotFound);
        }
        let record = todos.remove(&id).ok_or(TodoStoreError::TodoNotFound)?;
        Ok(record.todo)
    }

    async fn mark_complete(&self, id: i64, user_id: i64) -> Result<Todo, TodoStoreError> {
        let mut todos = self.todos.write().await;
        let record = todos
            .get_mut(&id)
            .filter(|r| r.todo.user_id == user_id)
            .ok_or(TodoStoreError::TodoNotFound)?;
        record.todo.completed = true;
        record.todo.completed_at = Some(Utc::now());
        Ok(record.todo.clone())
    }

    async fn list_by_tag(&self, tag_id: i64, user_id: i64) -> Result<Vec<Todo>, TodoStoreError> {
        let mut todos: Vec<Todo> = self
            .todos
            .read()
            .await
            .values()
            .filter(|r| r.todo.user_id == user_id && r.tag_ids.contains(&tag_id))
            .map(|r| r.todo.clone())
            .collect();
        todos.sort_by_key(|t| t.id);
        Ok(todos)
    }
}

/// In-memory tag store. Names are unique per user.
#[derive(Clone, Default)]
pub struct HashMapTagStore {
    tags: Arc<RwLock<HashMap<i64, Tag>>>,
    next_id: Arc<AtomicI64>,
}

impl HashMapTagStore {
    pub fn new() -> Self {
        Self {
            tags: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn insert_tag(&self, tags: &mut HashMap<i64, Tag>, name: &str, user_id: i64) -> Tag {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let tag = Tag {
            id,
            user_id,
            name: name.to_owned(),
            created_at: Utc::now(),
        };
        tags.insert(id, tag.clone());
        tag
    }
}

#[async_trait]
impl TagStore for HashMapTagStore {
    async fn list_for_user(&self, user_id: i64) -> Result<Vec<Tag>, TagStoreError> {
        let mut tags: Vec<Tag> = self
            .tags
            .read()
            .await
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tags.sort_by_key(|t| t.id);
        Ok(tags)
    }

    async fn find_for_user(&self, id: i64, user_id: i64) -> Result<Tag, TagStoreError> {
        self.tags
            .read()
            .await
            .get(&id)
            .filter(|t| t.user_id == user_id)
            .cloned()
            .ok_or(TagStoreError::TagNotFound)
    }

    async fn find_by_name(&self, name: &str, user_id: i64) -> Result<Tag, TagStoreError> {
        self.tags
            .read()
            .await
            .values()
            .find(|t| t.name == name && t.user_id == user_id)
            .cloned()
            .ok_or(TagStoreError::TagNotFound)
    }

    async fn find_or_create(&self, name: &str, user_id: i64) -> Result<Tag, TagStoreError> {
        let mut tags = self.tags.write().await;
        if let Some(tag) = tags
            .values()
            .find(|t| t.name == name && t.user_id == user_id)
        {
            return Ok(tag.clone());
        }
        Ok(self.insert_tag(&mut tags, name, user_id))
    }

    async fn create(&self, name: &str, user_id: i64) -> Result<Tag, TagStoreError> {
        let mut tags = self.tags.write().await;
        if tags
            .values()
            .any(|t| t.name == name && t.user_id == user_id)
        {
            return Err(TagStoreError::TagExists);
        }
        Ok(self.insert_tag(&mut tags, name, user_id))
    }

    async fn delete(&self, id: i64, user_id: i64) -> Result<Tag, TagStoreError> {
        let mut tags = self.tags.write().await;
        if !tags.get(&id).is_some_and(|t| t.user_id == user_id) {
            return Err(TagStoreError::TagNotFound);
        }
        tags.remove(&id).ok_or(TagStoreError::TagNotFound)
    }
}
