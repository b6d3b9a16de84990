use std::sync::Arc;

use crate::core::{current_time_millis, ProjectId, UserId};
use crate::error::{AppError, AppResult};
use crate::models::{NewProject, Project, ProjectUpdate, ProjectVisibility};
use crate::store::Store;
use crate::viewer::ViewerContext;

pub struct ProjectService {
    store: Arc<Store>,
}

impl ProjectService {
    pub fn new(store: Arc<Store>) -> Self {
        ProjectService { store }
    }

    pub async fn create_project(&self, vc: &ViewerContext, new_project: &NewProject) -> AppResult<Project> {
        let user_id = vc.require_user()?;

        if new_project.title.trim().is_empty() {
            return Err(AppError::Validation("A project needs a title".to_string()));
        }

        let now = current_time_millis();
        let project = Project {
            id: 0,
            user_id,
            title: new_project.title.trim().to_string(),
            description: new_project.description.clone(),
            visibility: new_project.visibility.unwrap_or(ProjectVisibility::Public),
            technologies: new_project.technologies.clone(),
            attachments: new_project.attachments.clone(),
            stars_count: 0,
            forks_count: 0,
            forked_from: None,
            created_at: now,
            updated_at: now,
        };

        Ok(self.store.insert_project(&project).await?)
    }

    pub async fn update_project(
        &self,
        vc: &ViewerContext,
        project_id: ProjectId,
        update: &ProjectUpdate,
    ) -> AppResult<Project> {
        let user_id = vc.require_user()?;

        let mut project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
        if project.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the owner can edit a project".to_string(),
            ));
        }

        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(AppError::Validation("A project needs a title".to_string()));
            }
            project.title = title.trim().to_string();
        }
        if let Some(description) = &update.description {
            project.description = Some(description.clone());
        }
        if let Some(visibility) = update.visibility {
            project.visibility = visibility;
        }
        if let Some(technologies) = &update.technologies {
            project.technologies = technologies.clone();
        }
        if let Some(attachments) = &update.attachments {
            project.attachments = attachments.clone();
        }
        project.updated_at = current_time_millis();

        self.store.update_project(&project).await?;
        Ok(project)
    }

    pub async fn delete_project(&self, vc: &ViewerContext, project_id: ProjectId) -> AppResult<()> {
        let user_id = vc.require_user()?;

        let project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
        if project.user_id != user_id {
            return Err(AppError::Forbidden(
                "Only the owner can delete a project".to_string(),
            ));
        }

        self.store.delete_project(project_id).await?;
        Ok(())
    }

    /// Visibility gate: public for everyone, internal for any signed-in
    /// viewer, private for the owner only.
    pub async fn get_project(&self, vc: &ViewerContext, project_id: ProjectId) -> AppResult<Project> {
        let project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

        let visible = match project.visibility {
            ProjectVisibility::Public => true,
            ProjectVisibility::Internal => vc.is_authenticated(),
            ProjectVisibility::Private => vc.user_id == Some(project.user_id),
        };
        if !visible {
            return Err(AppError::NotFound("Project not found".to_string()));
        }

        Ok(project)
    }

    pub async fn list_projects(&self, vc: &ViewerContext, limit: i64) -> AppResult<Vec<Project>> {
        Ok(self.store.get_projects_visible_to(vc.user_id, limit).await?)
    }

    pub async fn list_by_owner(&self, vc: &ViewerContext, owner_id: UserId) -> AppResult<Vec<Project>> {
        let include_hidden = vc.user_id == Some(owner_id);
        Ok(self
            .store
            .get_projects_by_owner(owner_id, include_hidden, vc.is_authenticated())
            .await?)
    }

    /// Flips the viewer's star; the project's star counter moves in the
    /// store transaction. Returns the new starred state.
    pub async fn toggle_star(&self, vc: &ViewerContext, project_id: ProjectId) -> AppResult<bool> {
        let user_id = vc.require_user()?;
        self.get_project(vc, project_id).await?;

        if self.store.get_star(project_id, user_id).await? {
            self.store.delete_star(project_id, user_id).await?;
            Ok(false)
        } else {
            self.store.insert_star(project_id, user_id).await?;
            Ok(true)
        }
    }

    /// Copies a visible project under the viewer's account, stamping the
    /// source and bumping its fork counter.
    pub async fn fork_project(&self, vc: &ViewerContext, project_id: ProjectId) -> AppResult<Project> {
        let user_id = vc.require_user()?;

        let source = self.get_project(vc, project_id).await?;
        if source.user_id == user_id {
            return Err(AppError::Validation("You cannot fork your own project".to_string()));
        }

        let fork_id = self.store.insert_fork(&source, user_id).await?;
        self.store
            .get_project(fork_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("fork {} missing after insert", fork_id)))
    }
}
