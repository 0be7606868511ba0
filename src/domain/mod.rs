//! Domain logic - pure release rules independent of any history provider

pub mod category;
pub mod commit;
pub mod reference;
pub mod release;
pub mod version;

pub use category::{CategorizedCommits, Category, CategoryGroup, Classification, CATEGORIES};
pub use commit::{CommitAuthor, LogicalCommit, RawCommit};
pub use reference::{ReferenceExtractor, ReferenceSet};
pub use release::{find_first_release, ReleasePage, ReleasePages, ReleaseRecord};
pub use version::BumpKind;
