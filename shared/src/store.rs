use uuid::Uuid;

use crate::types::{Project, Task};

/// In-memory owner of the project collection and of the at-most-one
/// selected project. The store is the only writer of either; views read
/// through the accessors, and every mutation is applied here only after
/// the active persistence backend confirmed it.
#[derive(Debug, Default)]
pub struct DomainStore {
    projects: Vec<Project>,
    selected: Option<Uuid>,
}

impl DomainStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn selected(&self) -> Option<&Project> {
        self.selected.and_then(|id| self.project(id))
    }

    pub fn selected_id(&self) -> Option<Uuid> {
        self.selected
    }

    pub fn select(&mut self, id: Uuid) {
        if self.project(id).is_some() {
            self.selected = Some(id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Replaces the whole collection, e.g. from a fresh remote listing.
    /// A selection pointing at a project that no longer exists is dropped.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        if let Some(id) = self.selected {
            if self.project(id).is_none() {
                self.selected = None;
            }
        }
    }

    /// Appends a confirmed project; if the backend echoed an id we
    /// already hold, the existing entry is replaced instead.
    pub fn insert_project(&mut self, project: Project) {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project,
            None => self.projects.push(project),
        }
    }

    /// Applies a confirmed title/description update. The task list is
    /// only ever mutated through the task operations.
    pub fn apply_project(&mut self, project: Project) {
        if let Some(existing) = self.projects.iter_mut().find(|p| p.id == project.id) {
            existing.title = project.title;
            existing.description = project.description;
        }
    }

    /// Removing an id that is not present is a no-op. Deleting the
    /// selected project also clears the selection.
    pub fn remove_project(&mut self, id: Uuid) {
        self.projects.retain(|p| p.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    pub fn insert_task(&mut self, project_id: Uuid, task: Task) {
        if let Some(project) = self.project_mut(project_id) {
            project.tasks.push(task);
        }
    }

    /// Scoped to the named project; a task in another project with the
    /// same id is never touched.
    pub fn apply_task(&mut self, project_id: Uuid, task: Task) {
        if let Some(project) = self.project_mut(project_id) {
            if let Some(existing) = project.tasks.iter_mut().find(|t| t.id == task.id) {
                *existing = task;
            }
        }
    }

    pub fn remove_task(&mut self, project_id: Uuid, task_id: Uuid) {
        if let Some(project) = self.project_mut(project_id) {
            project.tasks.retain(|t| t.id != task_id);
        }
    }

    /// Derived read: 0 for an unknown project or an empty task list,
    /// never an error.
    pub fn progress(&self, id: Uuid) -> u32 {
        self.project(id).map(Project::progress).unwrap_or(0)
    }

    fn project_mut(&mut self, id: Uuid) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str) -> Project {
        Project::new(title.into(), String::new())
    }

    fn task(title: &str) -> Task {
        Task::new(title.into(), String::new(), None)
    }

    #[test]
    fn progress_is_zero_for_unknown_project() {
        let store = DomainStore::new();
        assert_eq!(store.progress(Uuid::new_v4()), 0);
    }

    #[test]
    fn progress_follows_task_completion() {
        let mut store = DomainStore::new();
        let p = project("Website");
        let id = p.id;
        store.insert_project(p);
        assert_eq!(store.progress(id), 0);

        let mut done = task("Design");
        done.completed = true;
        store.insert_task(id, done.clone());
        store.insert_task(id, task("Build"));
        assert_eq!(store.progress(id), 50);

        store.remove_task(id, done.id);
        assert_eq!(store.progress(id), 0);
    }

    #[test]
    fn removing_a_project_twice_is_a_no_op() {
        let mut store = DomainStore::new();
        let p = project("Website");
        let id = p.id;
        store.insert_project(p);
        store.insert_project(project("Other"));

        store.remove_project(id);
        assert_eq!(store.projects().len(), 1);
        store.remove_project(id);
        assert_eq!(store.projects().len(), 1);
    }

    #[test]
    fn deleting_the_selected_project_clears_selection() {
        let mut store = DomainStore::new();
        let p = project("Website");
        let id = p.id;
        store.insert_project(p);
        store.select(id);
        assert_eq!(store.selected().map(|p| p.id), Some(id));

        store.remove_project(id);
        assert!(store.selected().is_none());
        assert!(store.selected_id().is_none());
    }

    #[test]
    fn at_most_one_project_selected() {
        let mut store = DomainStore::new();
        let first = project("First");
        let second = project("Second");
        let (first_id, second_id) = (first.id, second.id);
        store.insert_project(first);
        store.insert_project(second);

        store.select(first_id);
        store.select(second_id);
        assert_eq!(store.selected_id(), Some(second_id));

        store.clear_selection();
        assert!(store.selected_id().is_none());

        // selecting an unknown id is ignored
        store.select(Uuid::new_v4());
        assert!(store.selected_id().is_none());
    }

    #[test]
    fn set_projects_drops_dangling_selection() {
        let mut store = DomainStore::new();
        let p = project("Website");
        let id = p.id;
        store.insert_project(p);
        store.select(id);

        store.set_projects(vec![project("Fresh")]);
        assert!(store.selected_id().is_none());
    }

    #[test]
    fn apply_project_leaves_tasks_alone() {
        let mut store = DomainStore::new();
        let p = project("Website");
        let id = p.id;
        store.insert_project(p);
        store.insert_task(id, task("Design"));

        let mut renamed = project("Renamed");
        renamed.id = id;
        store.apply_project(renamed);

        let current = store.project(id).unwrap();
        assert_eq!(current.title, "Renamed");
        assert_eq!(current.tasks.len(), 1);
    }

    #[test]
    fn task_id_collisions_never_cross_projects() {
        let mut store = DomainStore::new();
        let first = project("First");
        let second = project("Second");
        let (first_id, second_id) = (first.id, second.id);
        store.insert_project(first);
        store.insert_project(second);

        let shared_task = task("Twin");
        store.insert_task(first_id, shared_task.clone());
        store.insert_task(second_id, shared_task.clone());

        let mut completed = shared_task.clone();
        completed.completed = true;
        store.apply_task(first_id, completed);
        assert!(store.project(first_id).unwrap().tasks[0].completed);
        assert!(!store.project(second_id).unwrap().tasks[0].completed);

        store.remove_task(first_id, shared_task.id);
        assert!(store.project(first_id).unwrap().tasks.is_empty());
        assert_eq!(store.project(second_id).unwrap().tasks.len(), 1);
    }

    #[test]
    fn insert_project_replaces_on_echoed_id() {
        let mut store = DomainStore::new();
        let p = project("Website");
        let id = p.id;
        store.insert_project(p.clone());
        store.insert_project(p);
        assert_eq!(store.projects().len(), 1);
        assert_eq!(store.projects()[0].id, id);
    }
}
