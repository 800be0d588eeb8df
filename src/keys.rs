use rand::Rng;

/// One of the eight resting positions of the home row, left pinky to right pinky.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum HomeRowKey {
    #[strum(serialize = "a")]
    A,
    #[strum(serialize = "s")]
    S,
    #[strum(serialize = "d")]
    D,
    #[strum(serialize = "f")]
    F,
    #[strum(serialize = "j")]
    J,
    #[strum(serialize = "k")]
    K,
    #[strum(serialize = "l")]
    L,
    #[strum(serialize = ";")]
    Semicolon,
}

impl HomeRowKey {
    pub const ALL: [HomeRowKey; 8] = [
        HomeRowKey::A,
        HomeRowKey::S,
        HomeRowKey::D,
        HomeRowKey::F,
        HomeRowKey::J,
        HomeRowKey::K,
        HomeRowKey::L,
        HomeRowKey::Semicolon,
    ];

    /// Membership test for the drill alphabet. Case sensitive: `'A'` is not a home-row key.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a' => Some(HomeRowKey::A),
            's' => Some(HomeRowKey::S),
            'd' => Some(HomeRowKey::D),
            'f' => Some(HomeRowKey::F),
            'j' => Some(HomeRowKey::J),
            'k' => Some(HomeRowKey::K),
            'l' => Some(HomeRowKey::L),
            ';' => Some(HomeRowKey::Semicolon),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            HomeRowKey::A => 'a',
            HomeRowKey::S => 's',
            HomeRowKey::D => 'd',
            HomeRowKey::F => 'f',
            HomeRowKey::J => 'j',
            HomeRowKey::K => 'k',
            HomeRowKey::L => 'l',
            HomeRowKey::Semicolon => ';',
        }
    }

    /// Mnemonic word shown under the prompt. `;` has none.
    pub fn example_word(&self) -> Option<&'static str> {
        match self {
            HomeRowKey::A => Some("Apple"),
            HomeRowKey::S => Some("Sun"),
            HomeRowKey::D => Some("Donkey"),
            HomeRowKey::F => Some("Fox"),
            HomeRowKey::J => Some("Joker"),
            HomeRowKey::K => Some("Kettle"),
            HomeRowKey::L => Some("Lion"),
            HomeRowKey::Semicolon => None,
        }
    }

    /// Independent uniform draw; the previous key may come up again.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}
