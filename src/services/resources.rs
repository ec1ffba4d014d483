//! Generic resource service

use validator::Validate;

use crate::{
    config::PaginationConfig,
    error::AppResult,
    models::pagination::{Page, PageParams, PageRequest},
    repository::{
        resources::{Listable, Writable},
        Repository,
    },
};

#[derive(Clone)]
pub struct ResourcesService {
    repository: Repository,
    pagination: PaginationConfig,
}

impl ResourcesService {
    pub fn new(repository: Repository, pagination: PaginationConfig) -> Self {
        Self {
            repository,
            pagination,
        }
    }

    pub async fn list<R: Listable>(&self, query: &R::Query, page: &PageParams) -> AppResult<Page<R>> {
        let page = PageRequest::resolve(page, &self.pagination);
        self.repository.resources.list::<R>(query, page).await
    }

    pub async fn get<R: Listable>(&self, id: i32) -> AppResult<R> {
        self.repository.resources.get::<R>(id).await
    }

    pub async fn create<R: Writable>(&self, data: &R::Create, actor: i32) -> AppResult<R> {
        data.validate()?;
        self.repository.resources.create::<R>(data, actor).await
    }

    pub async fn update<R: Writable>(&self, id: i32, data: &R::Update, actor: i32) -> AppResult<R> {
        data.validate()?;
        self.repository.resources.update::<R>(id, data, actor).await
    }

    pub async fn delete<R: Writable>(&self, id: i32) -> AppResult<()> {
        self.repository.resources.delete::<R>(id).await
    }
}
