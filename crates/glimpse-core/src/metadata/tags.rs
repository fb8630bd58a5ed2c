//! Tag identifiers and human-readable tag names, per directory.

use super::DirectoryKind;

/// Tags of IFD0, the Exif sub-IFD and the Interoperability IFD.
pub mod exif {
    pub const INTEROP_INDEX: u16 = 0x0001;
    pub const INTEROP_VERSION: u16 = 0x0002;
    pub const NEW_SUBFILE_TYPE: u16 = 0x00FE;
    pub const IMAGE_WIDTH: u16 = 0x0100;
    pub const IMAGE_HEIGHT: u16 = 0x0101;
    pub const BITS_PER_SAMPLE: u16 = 0x0102;
    pub const COMPRESSION: u16 = 0x0103;
    pub const PHOTOMETRIC_INTERPRETATION: u16 = 0x0106;
    pub const IMAGE_DESCRIPTION: u16 = 0x010E;
    pub const MAKE: u16 = 0x010F;
    pub const MODEL: u16 = 0x0110;
    pub const STRIP_OFFSETS: u16 = 0x0111;
    pub const ORIENTATION: u16 = 0x0112;
    pub const SAMPLES_PER_PIXEL: u16 = 0x0115;
    pub const X_RESOLUTION: u16 = 0x011A;
    pub const Y_RESOLUTION: u16 = 0x011B;
    pub const RESOLUTION_UNIT: u16 = 0x0128;
    pub const SOFTWARE: u16 = 0x0131;
    pub const DATETIME: u16 = 0x0132;
    pub const ARTIST: u16 = 0x013B;
    pub const YCBCR_POSITIONING: u16 = 0x0213;
    pub const COPYRIGHT: u16 = 0x8298;
    pub const EXPOSURE_TIME: u16 = 0x829A;
    pub const FNUMBER: u16 = 0x829D;
    pub const EXIF_OFFSET: u16 = 0x8769;
    pub const EXPOSURE_PROGRAM: u16 = 0x8822;
    pub const GPS_INFO: u16 = 0x8825;
    pub const ISO_EQUIVALENT: u16 = 0x8827;
    pub const EXIF_VERSION: u16 = 0x9000;
    pub const DATETIME_ORIGINAL: u16 = 0x9003;
    pub const DATETIME_DIGITIZED: u16 = 0x9004;
    pub const COMPONENTS_CONFIGURATION: u16 = 0x9101;
    pub const COMPRESSED_BITS_PER_PIXEL: u16 = 0x9102;
    pub const SHUTTER_SPEED: u16 = 0x9201;
    pub const APERTURE: u16 = 0x9202;
    pub const BRIGHTNESS: u16 = 0x9203;
    pub const EXPOSURE_BIAS: u16 = 0x9204;
    pub const MAX_APERTURE: u16 = 0x9205;
    pub const SUBJECT_DISTANCE: u16 = 0x9206;
    pub const METERING_MODE: u16 = 0x9207;
    pub const LIGHT_SOURCE: u16 = 0x9208;
    pub const FLASH: u16 = 0x9209;
    pub const FOCAL_LENGTH: u16 = 0x920A;
    pub const MAKER_NOTE: u16 = 0x927C;
    pub const USER_COMMENT: u16 = 0x9286;
    pub const SUBSECOND_TIME: u16 = 0x9290;
    pub const FLASHPIX_VERSION: u16 = 0xA000;
    pub const COLOR_SPACE: u16 = 0xA001;
    pub const EXIF_IMAGE_WIDTH: u16 = 0xA002;
    pub const EXIF_IMAGE_HEIGHT: u16 = 0xA003;
    pub const INTEROP_OFFSET: u16 = 0xA005;
    pub const SENSING_METHOD: u16 = 0xA217;
    pub const CUSTOM_RENDERED: u16 = 0xA401;
    pub const EXPOSURE_MODE: u16 = 0xA402;
    pub const WHITE_BALANCE: u16 = 0xA403;
    pub const DIGITAL_ZOOM_RATIO: u16 = 0xA404;
    pub const FOCAL_LENGTH_35MM: u16 = 0xA405;
    pub const SCENE_CAPTURE_TYPE: u16 = 0xA406;
    pub const LENS_MODEL: u16 = 0xA434;
}

/// Tags of the GPS sub-IFD.
pub mod gps {
    pub const VERSION_ID: u16 = 0x0000;
    pub const LATITUDE_REF: u16 = 0x0001;
    pub const LATITUDE: u16 = 0x0002;
    pub const LONGITUDE_REF: u16 = 0x0003;
    pub const LONGITUDE: u16 = 0x0004;
    pub const ALTITUDE_REF: u16 = 0x0005;
    pub const ALTITUDE: u16 = 0x0006;
    pub const TIMESTAMP: u16 = 0x0007;
    pub const MAP_DATUM: u16 = 0x0012;
    pub const DATESTAMP: u16 = 0x001D;
}

/// Fields of the baseline frame header.
pub mod jpeg {
    pub const DATA_PRECISION: u16 = 0;
    pub const IMAGE_HEIGHT: u16 = 1;
    pub const IMAGE_WIDTH: u16 = 3;
    pub const NUMBER_OF_COMPONENTS: u16 = 5;
    pub const COMPONENT_DATA_1: u16 = 6;
    pub const COMPONENT_DATA_2: u16 = 7;
    pub const COMPONENT_DATA_3: u16 = 8;
    pub const COMPONENT_DATA_4: u16 = 9;
}

/// The single field of a comment directory.
pub mod comment {
    pub const COMMENT: u16 = 0;
}

/// Human-readable name of a tag, if known.
pub fn tag_name(kind: DirectoryKind, id: u16) -> Option<&'static str> {
    match kind {
        DirectoryKind::Exif => exif_tag_name(id),
        DirectoryKind::Gps => gps_tag_name(id),
        DirectoryKind::Jpeg => jpeg_tag_name(id),
        DirectoryKind::JpegComment => (id == comment::COMMENT).then_some("Jpeg Comment"),
    }
}

fn exif_tag_name(id: u16) -> Option<&'static str> {
    use self::exif::*;
    let name = match id {
        INTEROP_INDEX => "Interoperability Index",
        INTEROP_VERSION => "Interoperability Version",
        NEW_SUBFILE_TYPE => "New Subfile Type",
        IMAGE_WIDTH => "Image Width",
        IMAGE_HEIGHT => "Image Height",
        BITS_PER_SAMPLE => "Bits Per Sample",
        COMPRESSION => "Compression",
        PHOTOMETRIC_INTERPRETATION => "Photometric Interpretation",
        IMAGE_DESCRIPTION => "Image Description",
        MAKE => "Make",
        MODEL => "Model",
        STRIP_OFFSETS => "Strip Offsets",
        ORIENTATION => "Orientation",
        SAMPLES_PER_PIXEL => "Samples Per Pixel",
        X_RESOLUTION => "X Resolution",
        Y_RESOLUTION => "Y Resolution",
        RESOLUTION_UNIT => "Resolution Unit",
        SOFTWARE => "Software",
        DATETIME => "Date/Time",
        ARTIST => "Artist",
        YCBCR_POSITIONING => "YCbCr Positioning",
        COPYRIGHT => "Copyright",
        EXPOSURE_TIME => "Exposure Time",
        FNUMBER => "F-Number",
        EXIF_OFFSET => "Exif Offset",
        EXPOSURE_PROGRAM => "Exposure Program",
        GPS_INFO => "GPS Info",
        ISO_EQUIVALENT => "ISO Speed Ratings",
        EXIF_VERSION => "Exif Version",
        DATETIME_ORIGINAL => "Date/Time Original",
        DATETIME_DIGITIZED => "Date/Time Digitized",
        COMPONENTS_CONFIGURATION => "Components Configuration",
        COMPRESSED_BITS_PER_PIXEL => "Compressed Bits Per Pixel",
        SHUTTER_SPEED => "Shutter Speed Value",
        APERTURE => "Aperture Value",
        BRIGHTNESS => "Brightness Value",
        EXPOSURE_BIAS => "Exposure Bias Value",
        MAX_APERTURE => "Max Aperture Value",
        SUBJECT_DISTANCE => "Subject Distance",
        METERING_MODE => "Metering Mode",
        LIGHT_SOURCE => "Light Source",
        FLASH => "Flash",
        FOCAL_LENGTH => "Focal Length",
        MAKER_NOTE => "Makernote",
        USER_COMMENT => "User Comment",
        SUBSECOND_TIME => "Sub-Sec Time",
        FLASHPIX_VERSION => "FlashPix Version",
        COLOR_SPACE => "Color Space",
        EXIF_IMAGE_WIDTH => "Exif Image Width",
        EXIF_IMAGE_HEIGHT => "Exif Image Height",
        INTEROP_OFFSET => "Interoperability Offset",
        SENSING_METHOD => "Sensing Method",
        CUSTOM_RENDERED => "Custom Rendered",
        EXPOSURE_MODE => "Exposure Mode",
        WHITE_BALANCE => "White Balance",
        DIGITAL_ZOOM_RATIO => "Digital Zoom Ratio",
        FOCAL_LENGTH_35MM => "Focal Length 35",
        SCENE_CAPTURE_TYPE => "Scene Capture Type",
        LENS_MODEL => "Lens Model",
        _ => return None,
    };
    Some(name)
}

fn gps_tag_name(id: u16) -> Option<&'static str> {
    use self::gps::*;
    let name = match id {
        VERSION_ID => "GPS Version ID",
        LATITUDE_REF => "GPS Latitude Ref",
        LATITUDE => "GPS Latitude",
        LONGITUDE_REF => "GPS Longitude Ref",
        LONGITUDE => "GPS Longitude",
        ALTITUDE_REF => "GPS Altitude Ref",
        ALTITUDE => "GPS Altitude",
        TIMESTAMP => "GPS Time-Stamp",
        MAP_DATUM => "GPS Map Datum",
        DATESTAMP => "GPS Date Stamp",
        _ => return None,
    };
    Some(name)
}

fn jpeg_tag_name(id: u16) -> Option<&'static str> {
    use self::jpeg::*;
    let name = match id {
        DATA_PRECISION => "Data Precision",
        IMAGE_HEIGHT => "Image Height",
        IMAGE_WIDTH => "Image Width",
        NUMBER_OF_COMPONENTS => "Number of Components",
        COMPONENT_DATA_1 => "Component 1",
        COMPONENT_DATA_2 => "Component 2",
        COMPONENT_DATA_3 => "Component 3",
        COMPONENT_DATA_4 => "Component 4",
        _ => return None,
    };
    Some(name)
}
