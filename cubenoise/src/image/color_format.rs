#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
#[repr(u8)]
pub enum ChannelCount {
    L = 1,
    LA = 2,
    #[default]
    Rgb = 3,
    Rgba = 4,
}

/// Storage type of a single channel sample.
#[derive(Debug, Hash, PartialEq, Eq, Copy, Clone, Default)]
pub enum SampleType {
    /// 8-bit unsigned, `[0, 255]`.
    #[default]
    U8,
    /// 32-bit float, range depends on the producer.
    F32,
}

#[derive(Clone, Copy, Debug, Hash, Default, PartialEq, Eq)]
pub struct ColorFormat {
    pub channel_count: ChannelCount,
    pub sample_type: SampleType,
}

impl ChannelCount {
    pub fn channel_count(&self) -> u8 {
        *self as u8
    }

    pub(crate) fn from_count(count: usize) -> Option<ChannelCount> {
        match count {
            1 => Some(ChannelCount::L),
            2 => Some(ChannelCount::LA),
            3 => Some(ChannelCount::Rgb),
            4 => Some(ChannelCount::Rgba),
            _ => None,
        }
    }
}

impl ColorFormat {
    pub const L_U8: ColorFormat = ColorFormat::new(ChannelCount::L, SampleType::U8);
    pub const RGB_U8: ColorFormat = ColorFormat::new(ChannelCount::Rgb, SampleType::U8);
    pub const RGBA_U8: ColorFormat = ColorFormat::new(ChannelCount::Rgba, SampleType::U8);
    pub const L_F32: ColorFormat = ColorFormat::new(ChannelCount::L, SampleType::F32);
    pub const RGB_F32: ColorFormat = ColorFormat::new(ChannelCount::Rgb, SampleType::F32);
    pub const RGBA_F32: ColorFormat = ColorFormat::new(ChannelCount::Rgba, SampleType::F32);

    pub const fn new(channel_count: ChannelCount, sample_type: SampleType) -> Self {
        Self {
            channel_count,
            sample_type,
        }
    }

    pub fn channels(&self) -> usize {
        self.channel_count.channel_count() as usize
    }

    /// Same channel layout with a different sample type.
    pub fn with_sample_type(self, sample_type: SampleType) -> Self {
        Self {
            sample_type,
            ..self
        }
    }
}

impl std::fmt::Display for ChannelCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelCount::L => write!(f, "L"),
            ChannelCount::LA => write!(f, "LA"),
            ChannelCount::Rgb => write!(f, "RGB"),
            ChannelCount::Rgba => write!(f, "RGBA"),
        }
    }
}

impl std::fmt::Display for SampleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleType::U8 => write!(f, "u8"),
            SampleType::F32 => write!(f, "f32"),
        }
    }
}

impl std::fmt::Display for ColorFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.channel_count, self.sample_type)
    }
}
