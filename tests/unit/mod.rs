//! Unit test modules.

mod inride_codec_test;
mod system_id_test;
mod usb_framer_test;
