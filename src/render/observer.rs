//! Progress and completion notifications emitted during a render

/// Receives notifications as a render advances
///
/// Every hook has an empty default so observers only implement what they
/// display. `render_completed` fires exactly once per successful render,
/// after the final frame and any encoding; a failed render never fires it.
pub trait RenderObserver {
    /// A frame is about to be stitched
    fn frame_started(&mut self, _index: usize, _total: usize, _rows: u32) {}

    /// One row of a frame has been stitched
    fn row_completed(&mut self, _index: usize, _row: u32) {}

    /// A frame has been fully stitched
    fn frame_completed(&mut self, _index: usize, _total: usize) {}

    /// The render produced its final output
    fn render_completed(&mut self) {}
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RenderObserver for NoopObserver {}
