//! Progress reporting for the fusion phases and the streamed answer

pub mod reporter;
