//! Repositories: one per resource, each over a typed document collection

use common::{Collection, DatabaseResult, Document, Filter, FindOptions, Sort};
use uuid::Uuid;

use crate::models::Page;

pub mod blog;
pub mod course;
pub mod notification;
pub mod portfolio;
pub mod project;
pub mod skill;
pub mod student;
pub mod user;

pub use blog::BlogRepository;
pub use course::CourseRepository;
pub use notification::NotificationRepository;
pub use portfolio::PortfolioRepository;
pub use project::ProjectRepository;
pub use skill::SkillRepository;
pub use student::StudentRepository;
pub use user::UserRepository;

/// Documents with a single owning user
pub trait Owned {
    fn owner(&self) -> Uuid;
}

/// One page of a filtered, sorted collection plus the unpaged total
pub(crate) async fn find_page<T: Document>(
    collection: &Collection<T>,
    filter: &Filter,
    sort: Vec<Sort>,
    page: Page,
) -> DatabaseResult<(Vec<T>, u64)> {
    let options = FindOptions::sorted(sort).page(page.page, page.limit);
    let items = collection.find(filter, &options).await?;
    let total = collection.count(filter).await?;
    Ok((items, total))
}

/// Fetch a document only when `owner` owns it; absence and foreign ownership look the same
pub(crate) async fn find_owned<T: Document + Owned>(
    collection: &Collection<T>,
    id: Uuid,
    owner: Uuid,
) -> DatabaseResult<Option<T>> {
    Ok(collection.get(id).await?.filter(|doc| doc.owner() == owner))
}
