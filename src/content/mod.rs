//! Content module - post models and listing pagination

mod pagination;
mod post;

pub use pagination::PostPagination;
pub use post::{
    Banner, ContentSection, PostDetail, PostDetailData, PostSummary, PostSummaryData, POST_TYPE,
};
