pub(crate) mod connections;
pub(crate) mod explosion;
pub(crate) mod init;
pub(crate) mod particle;
pub(crate) mod physics;
