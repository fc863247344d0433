//! Channel tables
//!
//! Which playlist channels are published (and under which category), and
//! how channel names used by third-party program guides map onto playlist
//! channel ids.

use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelCategory {
    NationalDvbT,
    Satellite,
    RegionalDvbT,
}

impl ChannelCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NationalDvbT => "National DVB-T",
            Self::Satellite => "Satellite",
            Self::RegionalDvbT => "Regional DVB-T",
        }
    }
}

const NATIONAL_DVB_T: &[&str] = &[
    "Rai1.it",
    "Rai2.it",
    "Rai3.it",
    "Rete4.it",
    "Canale5.it",
    "Italia1.it",
    "La7.it",
    "TV8.it",
    "Nove.it",
    "20.it",
    "Rai4.it",
    "Iris.it",
    "Rai5.it",
    "RaiMovie.it",
    "RaiPremium.it",
    "CieloTV.it",
    "27Twentyseven.it",
    "TV2000.va",
    "La7d.it",
    "La5.it",
    "RealTimeItaly.it",
    "QVCItaly.it",
    "FoodNetworkItaly.it",
    "Cine34.it",
    "Focus.it",
    "RTL1025TV.it",
    "WarnerTVItaly.it",
    "Giallo.it",
    "TopCrime.it",
    "BoingItaly.it",
    "K2.it",
    "RaiGulp.it",
    "RaiYoyo.it",
    "Frisbee.it",
    "CartoonitoItaly.it",
    "Super.it",
    "RaiNews24.it",
    "Italia2.it",
    "SkyTG24.it",
    "TGCom24.it",
    "DMAXItaly.it",
    "RaiStoria.it",
    "MediasetExtra.it",
    "HGTVItaly.it",
    "RaiScuola.it",
    "RaiSport.it",
    "MotorTrend.it",
    "Sportitalia.it",
    "TravelTV.it",
    "DonnaTV.it",
    "SuperTennis.it",
    "AlmaTV.it",
    "Radio105TV.it",
    "R101TV.it",
    "DeejayTV.it",
    "RadioItaliaTV.it",
    "KissKissTV.it",
    "RaiRadio2Visual.it",
    "RTL1025Traffic.it",
    "Radio24TV.it",
    "RadioFrecciaTV.it",
    "RDSSocialTV.it",
    "RadioZetaTV.it",
    "RadioTVSerieA.it",
];

const SATELLITE: &[&str] = &[
    "SportitaliaSolocalcio.it",
    "Bike.it",
    "RadioMonteCarloTV.it",
    "VirginRadioTV.it",
    "SenatoTV.it",
    "CameradeiDeputati.it",
    "Rai4K.it",
    "UniNettunoUniversityTV.it",
];

/// Guide channel name -> playlist channel id, grouped by LCN
const GUIDE_ALIASES: &[(&str, &str)] = &[
    // 1
    ("Rai1.it", "Rai1.it"),
    ("Rai 1", "Rai1.it"),
    ("Rai 1 HD.it", "Rai1.it"),
    // 2
    ("Rai2.it", "Rai2.it"),
    ("Rai 2", "Rai2.it"),
    ("Rai 2 HD.it", "Rai2.it"),
    // 3
    ("Rai3.it", "Rai3.it"),
    ("Rai 3", "Rai3.it"),
    ("Rai 3 HD.it", "Rai3.it"),
    // 4
    ("Rete4.it", "Rete4.it"),
    ("Rete 4", "Rete4.it"),
    ("Rete 4 HD.it", "Rete4.it"),
    // 5
    ("Canale5.it", "Canale5.it"),
    ("Canale 5", "Canale5.it"),
    ("Canale 5 HD.it", "Canale5.it"),
    // 6
    ("Italia1.it", "Italia1.it"),
    ("Italia 1", "Italia1.it"),
    ("Italia 1 HD.it", "Italia1.it"),
    // 7
    ("La7.it", "La7.it"),
    ("La7", "La7.it"),
    ("LA7 HD.it", "La7.it"),
    // 8
    ("Tv8.it", "TV8.it"),
    ("TV8", "TV8.it"),
    ("TV8 HD.it", "TV8.it"),
    // 9
    ("Nove.it", "Nove.it"),
    ("Nove", "Nove.it"),
    ("NOVE HD.it", "Nove.it"),
    // 10
    ("Rai4.it", "Rai4.it"),
    ("Rai 4", "Rai4.it"),
    ("Rai 4.it", "Rai4.it"),
    // 11
    ("Rai5.it", "Rai5.it"),
    ("Rai 5", "Rai5.it"),
    ("Rai 5.it", "Rai5.it"),
    // 12
    ("Rai Movie.it", "RaiMovie.it"),
    ("Rai Movie", "RaiMovie.it"),
    // 13
    ("Rai Gulp.it", "RaiGulp.it"),
    // 14
    ("Rai Yoyo.it", "RaiYoyo.it"),
    // 15
    ("La5.it", "La5.it"),
    ("La 5", "La5.it"),
    ("La 5 HD.it", "La5.it"),
    // 16
    ("Iris.it", "Iris.it"),
    ("Iris", "Iris.it"),
    ("Iris HD.it", "Iris.it"),
    // 17
    ("Cine34.it", "Cine34.it"),
    ("Cine34", "Cine34.it"),
    ("Cine34 HD.it", "Cine34.it"),
    // 19
    ("Rai News.it", "RaiNews24.it"),
    ("Rai News 24.it", "RaiNews24.it"),
    // 20
    ("20.it", "20.it"),
    ("20", "20.it"),
    ("20Mediaset HD.it", "20.it"),
    // 21
    ("La7D.it", "La7d.it"),
    ("La7d", "La7d.it"),
    ("LA7D.it", "La7d.it"),
    // 22
    ("Hgtv.it", "HGTVItaly.it"),
    ("HGTV HD.it", "HGTVItaly.it"),
    // 23
    ("Food Network Hd.it", "FoodNetworkItaly.it"),
    ("Food Network HD.it", "FoodNetworkItaly.it"),
    // 24
    ("Giallo.it", "Giallo.it"),
    ("Giallo", "Giallo.it"),
    ("GIALLO HD.it", "Giallo.it"),
    // 25
    ("Dmax.it", "DMAXItaly.it"),
    ("DMAX", "DMAXItaly.it"),
    ("DMAX HD.it", "DMAXItaly.it"),
    // 26
    ("Realtime.it", "RealTimeItaly.it"),
    ("Real Time", "RealTimeItaly.it"),
    ("Real Time HD.it", "RealTimeItaly.it"),
    // 27
    ("Cielo.it", "CieloTV.it"),
    ("Cielo", "CieloTV.it"),
    ("cielo.it", "CieloTV.it"),
    // 28
    ("Focus.it", "Focus.it"),
    ("Focus", "Focus.it"),
    ("Focus HD.it", "Focus.it"),
    // 29
    ("Mediaset Extra.it", "MediasetExtra.it"),
    ("Mediaset Extra", "MediasetExtra.it"),
    ("Mediaset Extra HD.it", "MediasetExtra.it"),
    // 30
    ("Super.it", "Super.it"),
    ("Super!.it", "Super.it"),
    // 31
    ("Boing.it", "BoingItaly.it"),
    ("Boing", "BoingItaly.it"),
    // 32
    ("K2.it", "K2.it"),
    ("K2", "K2.it"),
    // 33
    ("Frisbee.it", "Frisbee.it"),
    ("Frisbee", "Frisbee.it"),
    ("-frisbee-.it", "Frisbee.it"),
    // 34
    ("Cartoonito.it", "CartoonitoItaly.it"),
    ("Cartoonito", "CartoonitoItaly.it"),
    ("CARTOONITO DTT.it", "CartoonitoItaly.it"),
    // 39
    ("Topcrime.it", "TopCrime.it"),
    ("Top Crime", "TopCrime.it"),
    ("TOPcrime HD.it", "TopCrime.it"),
    // 50+
    ("Tv2000.it", "TV2000.va"),
    ("TV2000 HD.it", "TV2000.va"),
    ("Rai Premium.it", "RaiPremium.it"),
    ("Rai Sport1.it", "RaiSport.it"),
    ("RAI Sport.it", "RaiSport.it"),
    ("Rai Storia.it", "RaiStoria.it"),
    ("Italia2.it", "Italia2.it"),
    ("Italia 2", "Italia2.it"),
    ("Mediaset Italia2 HD.it", "Italia2.it"),
    ("Twentyseven.it", "27Twentyseven.it"),
    ("Twenty Seven", "27Twentyseven.it"),
    ("27Twentyseven HD.it", "27Twentyseven.it"),
    ("Warner Tv.it", "WarnerTVItaly.it"),
    ("Warner TV", "WarnerTVItaly.it"),
    ("Motor Trend.it", "MotorTrend.it"),
    ("Motor Trend HD.it", "MotorTrend.it"),
    ("Rai 4K.it", "Rai4K.it"),
    ("Mediaset Tgcom24.it", "TGCom24.it"),
    ("Tgcom24", "TGCom24.it"),
    ("TGCOM24 HD.it", "TGCom24.it"),
    ("Qvc.it", "QVCItaly.it"),
];

static CATEGORIES: LazyLock<HashMap<&'static str, ChannelCategory>> = LazyLock::new(|| {
    NATIONAL_DVB_T
        .iter()
        .map(|id| (*id, ChannelCategory::NationalDvbT))
        .chain(SATELLITE.iter().map(|id| (*id, ChannelCategory::Satellite)))
        .collect()
});

static ALIASES: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| GUIDE_ALIASES.iter().copied().collect());

/// Category of a playlist channel by `tvg-id`; unknown channels are regional.
#[must_use]
pub fn channel_category(tvg_id: Option<&str>) -> ChannelCategory {
    tvg_id
        .and_then(|id| CATEGORIES.get(id).copied())
        .unwrap_or(ChannelCategory::RegionalDvbT)
}

/// Playlist channel id for a guide channel name, `None` when unsupported
#[must_use]
pub fn canonical_channel_id(guide_channel: &str) -> Option<&'static str> {
    ALIASES.get(guide_channel).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_category() {
        assert_eq!(channel_category(Some("Rai1.it")), ChannelCategory::NationalDvbT);
        assert_eq!(channel_category(Some("Rai4K.it")), ChannelCategory::Satellite);
        assert_eq!(channel_category(Some("TeleLocale.it")), ChannelCategory::RegionalDvbT);
        assert_eq!(channel_category(None), ChannelCategory::RegionalDvbT);
        assert_eq!(ChannelCategory::NationalDvbT.as_str(), "National DVB-T");
    }

    #[test]
    fn test_canonical_channel_id() {
        assert_eq!(canonical_channel_id("Rai 1 HD.it"), Some("Rai1.it"));
        assert_eq!(canonical_channel_id("Tv2000.it"), Some("TV2000.va"));
        assert_eq!(canonical_channel_id("cielo.it"), Some("CieloTV.it"));
        assert_eq!(canonical_channel_id("Unknown.it"), None);
    }

    #[test]
    fn test_aliases_target_published_channels() {
        for &(alias, id) in GUIDE_ALIASES {
            assert_ne!(
                channel_category(Some(id)),
                ChannelCategory::RegionalDvbT,
                "{alias} maps to unpublished channel {id}"
            );
        }
    }
}
