//! Headless video/audio sink that records what the machine asked for.

use outworld_bytecode::PolyBuffer;
use serde::Serialize;

use super::host::{AudioSink, VideoSink};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    SelectPalette {
        palette: u8,
    },
    SelectPage {
        page: u8,
    },
    FillPage {
        page: u8,
        color: u8,
    },
    CopyPage {
        dst: u8,
        src: u8,
        scroll_y: i16,
    },
    BlitPage {
        page: u8,
    },
    DrawString {
        string: u16,
        x: u8,
        y: u8,
        color: u8,
    },
    DrawPolygons {
        #[serde(skip)]
        buffer: PolyBuffer,
        offset: u16,
        x: i16,
        y: i16,
        zoom: u16,
    },
    DrawBitmap {
        resource: u16,
    },
    PlaySound {
        id: u16,
        channel: u8,
        volume: u8,
        frequency: u8,
    },
    PlayMusic {
        id: u16,
        position: u8,
        delay: u16,
    },
    AdjustMusic {
        position: u8,
        delay: u16,
    },
    StopMusic,
}

impl HostCall {
    /// Snake-case name, matching the serialized `call` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectPalette { .. } => "select_palette",
            Self::SelectPage { .. } => "select_page",
            Self::FillPage { .. } => "fill_page",
            Self::CopyPage { .. } => "copy_page",
            Self::BlitPage { .. } => "blit_page",
            Self::DrawString { .. } => "draw_string",
            Self::DrawPolygons { .. } => "draw_polygons",
            Self::DrawBitmap { .. } => "draw_bitmap",
            Self::PlaySound { .. } => "play_sound",
            Self::PlayMusic { .. } => "play_music",
            Self::AdjustMusic { .. } => "adjust_music",
            Self::StopMusic => "stop_music",
        }
    }
}

/// Records every host call in order.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub calls: Vec<HostCall>,
    /// Number of `blit_page` calls, i.e. frames presented.
    pub frames: u64,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain recorded calls, keeping the frame counter.
    pub fn take(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }
}

impl VideoSink for Recorder {
    fn select_palette(&mut self, palette: u8) {
        self.calls.push(HostCall::SelectPalette { palette });
    }

    fn select_page(&mut self, page: u8) {
        self.calls.push(HostCall::SelectPage { page });
    }

    fn fill_page(&mut self, page: u8, color: u8) {
        self.calls.push(HostCall::FillPage { page, color });
    }

    fn copy_page(&mut self, dst: u8, src: u8, scroll_y: i16) {
        self.calls.push(HostCall::CopyPage { dst, src, scroll_y });
    }

    fn blit_page(&mut self, page: u8) {
        self.frames += 1;
        self.calls.push(HostCall::BlitPage { page });
    }

    fn draw_string(&mut self, string: u16, x: u8, y: u8, color: u8) {
        self.calls.push(HostCall::DrawString {
            string,
            x,
            y,
            color,
        });
    }

    fn draw_polygons(&mut self, buffer: PolyBuffer, offset: u16, x: i16, y: i16, zoom: u16) {
        self.calls.push(HostCall::DrawPolygons {
            buffer,
            offset,
            x,
            y,
            zoom,
        });
    }

    fn draw_bitmap(&mut self, resource: u16) {
        self.calls.push(HostCall::DrawBitmap { resource });
    }
}

impl AudioSink for Recorder {
    fn play_sound(&mut self, id: u16, channel: u8, volume: u8, frequency: u8) {
        self.calls.push(HostCall::PlaySound {
            id,
            channel,
            volume,
            frequency,
        });
    }

    fn play_music(&mut self, id: u16, position: u8, delay: u16) {
        self.calls.push(HostCall::PlayMusic {
            id,
            position,
            delay,
        });
    }

    fn adjust_music(&mut self, position: u8, delay: u16) {
        self.calls.push(HostCall::AdjustMusic { position, delay });
    }

    fn stop_music(&mut self) {
        self.calls.push(HostCall::StopMusic);
    }
}
