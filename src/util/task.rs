use std::collections::HashMap;
use std::hash::Hash;
use tokio::task::JoinHandle;

/// Keyed background tasks. Replacing, removing or dropping a task aborts it.
pub struct TaskManager<K> {
    tasks: HashMap<K, JoinHandle<()>>,
}

impl<K: Hash + Eq> Default for TaskManager<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq> TaskManager<K> {
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
        }
    }

    pub fn spawn(&mut self, key: K, task: JoinHandle<()>) {
        if let Some(handle) = self.tasks.insert(key, task) {
            handle.abort();
        }
    }

    pub fn abort(&mut self, key: &K) -> bool {
        match self.tasks.remove(key) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn abort_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        self.tasks.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<K> Drop for TaskManager<K> {
    fn drop(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn pending() -> JoinHandle<()> {
        tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        })
    }

    #[tokio::test]
    async fn replacing_a_key_aborts_the_old_task() {
        let mut tasks = TaskManager::new();
        let first = pending();
        let first_abort = first.abort_handle();
        tasks.spawn("fetch", first);
        tasks.spawn("fetch", pending());

        settle().await;
        assert!(first_abort.is_finished());
        assert_eq!(tasks.len(), 1);
    }

    #[tokio::test]
    async fn abort_removes_the_task() {
        let mut tasks = TaskManager::new();
        let handle = pending();
        let abort = handle.abort_handle();
        tasks.spawn(7u64, handle);

        assert!(tasks.abort(&7));
        assert!(!tasks.abort(&7));
        settle().await;
        assert!(abort.is_finished());
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn dropping_the_manager_aborts_everything() {
        let handle = pending();
        let abort = handle.abort_handle();
        {
            let mut tasks = TaskManager::new();
            tasks.spawn(1u64, handle);
        }
        settle().await;
        assert!(abort.is_finished());
    }
}
