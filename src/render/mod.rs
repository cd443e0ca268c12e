pub(crate) mod camera;
pub(crate) mod cpu;
pub(crate) mod immediate;
pub(crate) mod retained;
