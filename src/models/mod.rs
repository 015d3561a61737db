mod dataset;
mod dataset_state;
mod index_record;
mod page;

pub use dataset::Dataset;
pub use dataset_state::DatasetState;
pub use index_record::IndexRecord;
pub use page::PageRequest;
