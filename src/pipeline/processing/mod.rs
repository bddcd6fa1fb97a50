// Row-level processing: filter, normalize, derive status, assemble

pub mod assembler;
pub mod columns;
pub mod normalize;
pub mod row_filter;
pub mod status;
