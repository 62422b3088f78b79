use serde::Serialize;

use crate::error::{FormatErrorKind, Result};
use crate::field::FixedString;
use crate::fixed_field;
use crate::reader::Reader;
use crate::records::Record;
use crate::records::sub::{BNAM, CNAM, FNAM, SNAM};
use crate::tag::Tag;
use crate::writer::Writer;

const WEAT: Tag = Tag::new(b"WEAT");

fixed_field! {
    /// Weather chances in percent.
    pub struct WeatherData {
        pub clear: u8,
        pub cloudy: u8,
        pub foggy: u8,
        pub overcast: u8,
        pub rain: u8,
        pub thunder: u8,
        pub ash: u8,
        pub blight: u8,
    }
}

fixed_field! {
    pub struct SoundRef {
        pub sound: FixedString<32>,
        pub chance: u8,
    }
}

/// Two extra weather chances added by the Bloodmoon expansion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ExtraWeather {
    pub snow: u8,
    pub blizzard: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Region {
    pub name: String,
    pub weather: WeatherData,
    /// Only present in 10-byte WEAT subrecords.
    pub extra_weather: Option<ExtraWeather>,
    /// Levelled creature list used when sleeping outdoors.
    pub sleep_list: String,
    /// Map colour, packed RGBA.
    pub map_color: i32,
    pub sounds: Vec<SoundRef>,
}

impl Record for Region {
    const TAG: Tag = Tag::new(b"REGN");

    fn load(r: &mut Reader) -> Result<Self> {
        let name = r.get_hn_string(FNAM)?;

        r.get_sub_name_is(WEAT)?;
        r.get_sub_header()?;
        let (weather, extra_weather) = match r.sub_size() {
            8 => (r.get_t()?, None),
            10 => {
                let [w @ .., snow, blizzard] = r.get_t::<[u8; 10]>()?;
                let weather = WeatherData {
                    clear: w[0],
                    cloudy: w[1],
                    foggy: w[2],
                    overcast: w[3],
                    rain: w[4],
                    thunder: w[5],
                    ash: w[6],
                    blight: w[7],
                };
                (weather, Some(ExtraWeather { snow, blizzard }))
            }
            found => {
                return Err(r.fail(FormatErrorKind::SubSizeMismatch {
                    expected: 8,
                    found,
                }));
            }
        };

        let sleep_list = r.get_hno_string(BNAM)?;
        let map_color = r.get_hnt(CNAM)?;

        let mut sounds = Vec::new();
        while r.is_next_sub(SNAM)? {
            sounds.push(r.get_ht()?);
        }

        Ok(Self {
            name,
            weather,
            extra_weather,
            sleep_list,
            map_color,
            sounds,
        })
    }

    fn save(&self, w: &mut Writer) {
        w.write_hn_c_string(FNAM, &self.name);
        match self.extra_weather {
            None => w.write_hnt(WEAT, &self.weather),
            Some(extra) => {
                w.start_sub_record(WEAT);
                w.write_t(&self.weather);
                w.write_t(&extra.snow);
                w.write_t(&extra.blizzard);
                w.end_sub_record();
            }
        }
        w.write_hno_c_string(BNAM, &self.sleep_list);
        w.write_hnt(CNAM, &self.map_color);
        for sound in &self.sounds {
            w.write_hnt(SNAM, sound);
        }
    }
}
