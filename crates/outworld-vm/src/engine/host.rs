//! Collaborators the machine drives.
//!
//! The interpreter never draws, plays or loads anything itself. Each
//! media opcode forwards its decoded operands to one of these traits.

use outworld_bytecode::PolyBuffer;
use outworld_core::ResourceEntry;

/// Error returned by a resource loader.
pub type ResourceError = Box<dyn std::error::Error + Send + Sync>;

pub trait VideoSink {
    fn select_palette(&mut self, palette: u8);

    /// Make `page` the target of subsequent drawing.
    fn select_page(&mut self, page: u8);

    fn fill_page(&mut self, page: u8, color: u8);

    /// Copy `src` onto `dst`, shifted vertically by `scroll_y` rows.
    fn copy_page(&mut self, dst: u8, src: u8, scroll_y: i16);

    /// Present `page` on screen.
    fn blit_page(&mut self, page: u8);

    fn draw_string(&mut self, string: u16, x: u8, y: u8, color: u8);

    fn draw_polygons(&mut self, buffer: PolyBuffer, offset: u16, x: i16, y: i16, zoom: u16);

    /// A bitmap resource was just loaded and should replace the background.
    fn draw_bitmap(&mut self, resource: u16);
}

pub trait AudioSink {
    fn play_sound(&mut self, id: u16, channel: u8, volume: u8, frequency: u8);

    fn play_music(&mut self, id: u16, position: u8, delay: u16);

    /// Change position or tempo of the running module; zero leaves a field as is.
    fn adjust_music(&mut self, position: u8, delay: u16);

    fn stop_music(&mut self);
}

pub trait ResourceProvider {
    /// Describe resource `id`, or `None` if the memory list has no such entry.
    fn resource(&self, id: u16) -> Option<ResourceEntry>;

    /// Load resource `id`. An id beyond the memory list is a game part
    /// request, honoured by the embedder once the current pass returns.
    fn load_resource(&mut self, id: u16) -> Result<(), ResourceError>;
}

/// Monotonic millisecond counter.
pub trait Clock {
    fn ticks(&self) -> u32;
}

/// Everything a scheduling pass needs from its environment.
pub trait Host: VideoSink + AudioSink + ResourceProvider {}

impl<T: VideoSink + AudioSink + ResourceProvider + ?Sized> Host for T {}
