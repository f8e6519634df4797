//! Reference grooves: 12 genres × 12 styles.
//!
//! Every style has its own descriptor. Grids are 16 steps per 4/4 measure
//! (sixteenths), 12 per 3/4 measure (sixteenths) and 12 per 12/8 measure
//! (triplet eighths). See `pattern` for the step letters.

use tracing::error;

use crate::{
    error::Result,
    sequencing::{
        library::{Style, StyleKey, StyleLibrary},
        pattern::{Instrument, Instrument::*, Pattern},
        time_signature::TimeSignature,
    },
};

struct Groove {
    id: u8,
    name: &'static str,
    meter: TimeSignature,
    bpm: (f32, f32),
    swing: f64,
    intensity: f32,
    tracks: &'static [(Instrument, &'static str)],
}

const fn groove(
    id: u8,
    name: &'static str,
    bpm: (f32, f32),
    swing: f64,
    intensity: f32,
    tracks: &'static [(Instrument, &'static str)],
) -> Groove {
    Groove {
        id,
        name,
        meter: TimeSignature::FOUR_FOUR,
        bpm,
        swing,
        intensity,
        tracks,
    }
}

impl Groove {
    const fn in_meter(self, meter: TimeSignature) -> Self {
        Groove { meter, ..self }
    }

    fn pattern(&self) -> Result<Pattern> {
        self.tracks
            .iter()
            .fold(Pattern::builder(self.meter), |builder, (instrument, grid)| {
                builder.steps(*instrument, grid)
            })
            .tempo_range(self.bpm.0, self.bpm.1)
            .swing(self.swing)
            .intensity(self.intensity)
            .build()
    }
}

const STRAIGHT: f64 = 0.5;
const LIGHT: f64 = 0.58;
const SHUFFLE: f64 = 0.67;
const HARD: f64 = 0.72;

const THREE_FOUR: TimeSignature = TimeSignature::THREE_FOUR;
const TWELVE_EIGHT: TimeSignature = TimeSignature::TWELVE_EIGHT;
const SIX_EIGHT: TimeSignature = TimeSignature::SIX_EIGHT;

const ROCK: [Groove; 12] = [
    groove(1, "Straight Rock", (90.0, 140.0), STRAIGHT, 0.6, &[
        (Kick, "x...x...x...x..."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x......."),
    ]),
    groove(2, "Driving Eighths", (110.0, 160.0), STRAIGHT, 0.75, &[
        (Kick, "x.x...x.x.x....."),
        (Snare, "....X.......X..."),
        (ClosedHat, "X.x.X.x.X.x.X.x."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(3, "Half-Time", (60.0, 90.0), STRAIGHT, 0.5, &[
        (Kick, "x.....x...x....."),
        (Snare, "........X......."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x..............."),
    ]),
    groove(4, "Hard Rock", (100.0, 150.0), STRAIGHT, 0.9, &[
        (Kick, "x..x..x.x..x...."),
        (Snare, "....X.......X..."),
        (OpenHat, "x...x...x...x..."),
        (Crash, "x..............."),
        (Piano, "x.......x.......")
    ]),
    groove(5, "Rock Shuffle", (90.0, 130.0), SHUFFLE, 0.65, &[
        (Kick, "x.....x.x......."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(6, "Power Ballad", (60.0, 80.0), STRAIGHT, 0.4, &[
        (Kick, "x.......x.x....."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x...x...x...x..."),
        (Piano, "x...x...x...x..."),
    ]),
    groove(7, "Punk", (160.0, 220.0), STRAIGHT, 1.0, &[
        (Kick, "x.x.x.x.x.x.x.x."),
        (Snare, "..X...X...X...X."),
        (Crash, "x...x...x...x..."),
        (Piano, "x.......x......."),
    ]),
    groove(8, "Classic Rock", (100.0, 135.0), STRAIGHT, 0.7, &[
        (Kick, "x.....x.x.x....."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.....x.....x..."),
    ]),
    groove(9, "Southern Rock", (85.0, 120.0), LIGHT, 0.65, &[
        (Kick, "x......xx......."),
        (Snare, "....X..o....X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x...x.x.....x..."),
    ]),
    groove(10, "Garage", (130.0, 170.0), STRAIGHT, 0.85, &[
        (Kick, "x...x.x.x...x.x."),
        (Snare, "....X.......X.X."),
        (Ride, "x.x.x.x.x.x.x.x."),
        (Piano, "x...x...x...x..."),
    ]),
    groove(11, "Arena Rock", (110.0, 140.0), STRAIGHT, 0.8, &[
        (Kick, "x.x.....x.x....."),
        (Snare, "....X.......X..."),
        (Clap, "....x.......x..."),
        (OpenHat, "x...x...x...x..."),
        (Piano, "x.......x.......")
    ]),
    groove(12, "Rock Waltz", (80.0, 120.0), STRAIGHT, 0.5, &[
        (Kick, "x..........."),
        (Snare, "....x...x..."),
        (ClosedHat, "x.x.x.x.x.x."),
        (Piano, "x...x...x..."),
    ])
    .in_meter(THREE_FOUR),
];

const POP: [Groove; 12] = [
    groove(1, "Pop Rock", (100.0, 130.0), STRAIGHT, 0.6, &[
        (Kick, "x.....x.x......."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.....x.....x..."),
    ]),
    groove(2, "Dance Pop", (115.0, 130.0), STRAIGHT, 0.8, &[
        (Kick, "x...x...x...x..."),
        (Clap, "....X.......X..."),
        (OpenHat, "..x...x...x...x."),
        (Piano, "x..x..x...x..x.."),
    ]),
    groove(3, "Pop Ballad", (60.0, 80.0), STRAIGHT, 0.35, &[
        (Kick, "x.......x......."),
        (Snare, "....x.......x..."),
        (ClosedHat, "x...x...x...x..."),
        (Piano, "x...x...x...x..."),
    ]),
    groove(4, "Synth Pop", (110.0, 128.0), STRAIGHT, 0.65, &[
        (Kick, "x...x...x...x..."),
        (Snare, "....X.......X..."),
        (ClosedHat, "xxxxxxxxxxxxxxxx"),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(5, "Pop Shuffle", (90.0, 115.0), SHUFFLE, 0.55, &[
        (Kick, "x.....x...x....."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.....x.x.......")
    ]),
    groove(6, "Four on the Floor", (118.0, 128.0), STRAIGHT, 0.75, &[
        (Kick, "x...x...x...x..."),
        (Snare, "....X.......X..."),
        (OpenHat, "..x...x...x...x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(7, "Teen Pop", (95.0, 120.0), STRAIGHT, 0.6, &[
        (Kick, "x..x....x.x....."),
        (Clap, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x..x..x.x..x..x."),
    ]),
    groove(8, "Indie Pop", (110.0, 140.0), STRAIGHT, 0.55, &[
        (Kick, "x.x.....x.x....."),
        (Snare, "....x.......x..."),
        (Tom, "......l.......l."),
        (Piano, "x.......x.......")
    ]),
    groove(9, "Power Pop", (130.0, 160.0), STRAIGHT, 0.8, &[
        (Kick, "x...x.x.x...x.x."),
        (Snare, "....X.......X..."),
        (ClosedHat, "X.x.X.x.X.x.X.x."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(10, "Soft Pop", (70.0, 95.0), STRAIGHT, 0.3, &[
        (Kick, "x.........x....."),
        (Snare, "....r.......r..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x.......")
    ]),
    groove(11, "Electro Pop", (120.0, 132.0), STRAIGHT, 0.85, &[
        (Kick, "x...x...x...x..x"),
        (Clap, "....X.......X..."),
        (ClosedHat, "..x...x...x...x."),
        (Piano, "x..x..x.........")
    ]),
    groove(12, "Pop Waltz", (90.0, 130.0), STRAIGHT, 0.45, &[
        (Kick, "x..........."),
        (Snare, "....x...x..."),
        (ClosedHat, "x...x...x..."),
        (Piano, "x...x...x..."),
    ])
    .in_meter(THREE_FOUR),
];

const BLUES: [Groove; 12] = [
    groove(1, "Blues Shuffle", (80.0, 120.0), SHUFFLE, 0.55, &[
        (Kick, "x.....x.x......."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(2, "Slow Blues", (50.0, 70.0), STRAIGHT, 0.4, &[
        (Kick, "x.....x....."),
        (Snare, "...X.....X.."),
        (Ride, "xxxxxxxxxxxx"),
        (Piano, "x..x..x..x.."),
    ])
    .in_meter(TWELVE_EIGHT),
    groove(3, "Texas Shuffle", (100.0, 140.0), HARD, 0.7, &[
        (Kick, "x...x...x...x..."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.....x.....x..."),
    ]),
    groove(4, "Chicago Blues", (90.0, 125.0), SHUFFLE, 0.6, &[
        (Kick, "x.......x.x....."),
        (Snare, "....X..o....X..."),
        (Ride, "x.x.x.x.x.x.x.x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(5, "Delta Stomp", (70.0, 100.0), LIGHT, 0.45, &[
        (Kick, "x...x...x...x..."),
        (Clap, "....x.......x..."),
        (Piano, "x.......x.......")
    ]),
    groove(6, "Boogie", (120.0, 160.0), SHUFFLE, 0.75, &[
        (Kick, "x.x.x.x.x.x.x.x."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(7, "Blues Rock", (100.0, 130.0), STRAIGHT, 0.75, &[
        (Kick, "x.....x.x.x....."),
        (Snare, "....X.......X..."),
        (OpenHat, "x...x...x...x..."),
        (Piano, "x.....x.........")
    ]),
    groove(8, "Minor Blues", (60.0, 85.0), STRAIGHT, 0.4, &[
        (Kick, "x.....x....."),
        (Snare, "...x.....x.."),
        (ClosedHat, "x.xx.xx.xx.x"),
        (Piano, "x.....x....."),
    ])
    .in_meter(TWELVE_EIGHT),
    groove(9, "Jump Blues", (140.0, 190.0), SHUFFLE, 0.8, &[
        (Kick, "x...x...x...x..."),
        (Snare, "....X.......X..."),
        (Ride, "x.x.x.x.x.x.x.x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(10, "Swamp Blues", (70.0, 95.0), HARD, 0.5, &[
        (Kick, "x.......x..x...."),
        (Snare, "....r.......r..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.....x.........")
    ]),
    groove(11, "Blues Ballad", (55.0, 70.0), STRAIGHT, 0.3, &[
        (Kick, "x..........."),
        (Snare, "......x....."),
        (Ride, "x..x..x..x.."),
        (Piano, "x.....x....."),
    ])
    .in_meter(TWELVE_EIGHT),
    groove(12, "Blues Waltz", (90.0, 130.0), SHUFFLE, 0.45, &[
        (Kick, "x..........."),
        (Snare, "....x...x..."),
        (Ride, "x.x.x.x.x.x."),
        (Piano, "x...x...x..."),
    ])
    .in_meter(THREE_FOUR),
];

const JAZZ: [Groove; 12] = [
    groove(1, "Medium Swing", (110.0, 180.0), SHUFFLE, 0.5, &[
        (Kick, "x...x...x...x..."),
        (ClosedHat, "....x.......x..."),
        (Ride, "x...x.x.x...x.x."),
        (Piano, "......x.......x."),
    ]),
    groove(2, "Up-Tempo Swing", (200.0, 240.0), LIGHT, 0.7, &[
        (Kick, "x..............."),
        (ClosedHat, "....x.......x..."),
        (Ride, "x...x.x.x...x.x."),
        (Piano, "..x.....x.....x."),
    ]),
    groove(3, "Jazz Ballad", (50.0, 80.0), SHUFFLE, 0.25, &[
        (Snare, "o.o.o.o.o.o.o.o."),
        (ClosedHat, "....x.......x..."),
        (Ride, "x...x...x...x..."),
        (Piano, "x.......x.......")
    ]),
    groove(4, "Bossa Nova", (110.0, 140.0), STRAIGHT, 0.4, &[
        (Kick, "x..xx..xx..xx..x"),
        (Snare, "r..r..r...r..r.."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x..x..x...x..x.."),
    ]),
    groove(5, "Jazz Waltz", (120.0, 180.0), SHUFFLE, 0.45, &[
        (Kick, "x..........."),
        (ClosedHat, "....x...x..."),
        (Ride, "x...x.x.x..."),
        (Piano, "....x.....x."),
    ])
    .in_meter(THREE_FOUR),
    groove(6, "Bebop", (180.0, 240.0), LIGHT, 0.75, &[
        (Kick, "..........x....."),
        (Snare, "......o.......o."),
        (ClosedHat, "....x.......x..."),
        (Ride, "x...x.x.x...x.x."),
        (Piano, "...x......x.....")
    ]),
    groove(7, "Cool Jazz", (90.0, 140.0), SHUFFLE, 0.35, &[
        (Kick, "x.......x......."),
        (ClosedHat, "....x.......x..."),
        (Ride, "x...x.x.x...x.x."),
        (Piano, "x.......x.......")
    ]),
    groove(8, "Hard Bop", (140.0, 200.0), SHUFFLE, 0.65, &[
        (Kick, "x.......x......."),
        (Snare, "......o.....x..."),
        (ClosedHat, "....x.......x..."),
        (Ride, "x...x.x.x...x.x."),
        (Piano, "......x.......x."),
    ]),
    groove(9, "Jazz Samba", (160.0, 210.0), STRAIGHT, 0.6, &[
        (Kick, "x..xx..xx..xx..x"),
        (Snare, "..r..r...r..r..."),
        (Ride, "x.xxx.xxx.xxx.xx"),
        (Piano, "x..x..x...x..x.."),
    ]),
    groove(10, "Modal", (100.0, 150.0), STRAIGHT, 0.5, &[
        (Kick, "x.....x.....x..."),
        (Snare, "...o.....o......"),
        (Ride, "x.x.x.x.x.x.x.x."),
        (Piano, "x.....x.........")
    ]),
    groove(11, "Brushes", (70.0, 120.0), SHUFFLE, 0.3, &[
        (Snare, "x.o.x.o.x.o.x.o."),
        (ClosedHat, "....x.......x..."),
        (Piano, "x.......x.......")
    ]),
    groove(12, "Jazz Funk", (95.0, 115.0), STRAIGHT, 0.7, &[
        (Kick, "x..x......x..x.."),
        (Snare, "....X..o.o..X..o"),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "..x..x....x..x..")
    ]),
];

const FUNK: [Groove; 12] = [
    groove(1, "Classic Funk", (95.0, 115.0), STRAIGHT, 0.7, &[
        (Kick, "x.x.......x....."),
        (Snare, "....X..o.o..X..o"),
        (ClosedHat, "xxxxxxxxxxxxxxxx"),
        (Piano, "..x..x....x..x.."),
    ]),
    groove(2, "Funk Shuffle", (85.0, 105.0), LIGHT, 0.65, &[
        (Kick, "x..x..x...x....."),
        (Snare, "....X.o.....X.o."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x..x....x..x....")
    ]),
    groove(3, "Slap Funk", (100.0, 120.0), STRAIGHT, 0.8, &[
        (Kick, "x.....x...x..x.."),
        (Snare, "....X.......X..."),
        (OpenHat, "..x...x...x...x."),
        (Piano, "...x...x...x...x"),
    ]),
    groove(4, "New Orleans Funk", (90.0, 110.0), LIGHT, 0.7, &[
        (Kick, "x..x..x...x..x.."),
        (Snare, "..o.X.o..o.oX.o."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x..x..x.........")
    ]),
    groove(5, "Disco Funk", (110.0, 125.0), STRAIGHT, 0.8, &[
        (Kick, "x...x...x...x..."),
        (Snare, "....X.......X..."),
        (OpenHat, "..x...x...x...x."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(6, "Go-Go", (90.0, 105.0), LIGHT, 0.75, &[
        (Kick, "x.....x...x....."),
        (Snare, "...x..X....x..X."),
        (Tom, "h..h..l.h..h..l."),
        (Piano, "x.....x.........")
    ]),
    groove(7, "P-Funk", (95.0, 110.0), STRAIGHT, 0.75, &[
        (Kick, "x......x..x....."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.xxx.xxx.xxx.xx"),
        (Piano, "x.......x.......")
    ]),
    groove(8, "Funk Rock", (105.0, 130.0), STRAIGHT, 0.85, &[
        (Kick, "x.x...x.x.x....."),
        (Snare, "....X.......X..."),
        (ClosedHat, "X.x.X.x.X.x.X.x."),
        (Piano, "x.x...x.x.x.....")
    ]),
    groove(9, "Jazz-Funk Fusion", (100.0, 125.0), STRAIGHT, 0.7, &[
        (Kick, "x..x..x...x....."),
        (Snare, "....X..o.o..X..."),
        (Ride, "x.x.x.x.x.x.x.x."),
        (Piano, "..x..x...x..x...")
    ]),
    groove(10, "Linear Funk", (90.0, 110.0), STRAIGHT, 0.65, &[
        (Kick, "x.....x...x....."),
        (Snare, "....X.......X..."),
        (ClosedHat, ".xx.x..x.x..x.xx"),
        (Piano, "...x.......x....")
    ]),
    groove(11, "Half-Time Funk", (70.0, 90.0), STRAIGHT, 0.6, &[
        (Kick, "x..x......x....."),
        (Snare, "........X......o"),
        (ClosedHat, "xxxxxxxxxxxxxxxx"),
        (Piano, "x.........x.....")
    ]),
    groove(12, "Funk Ballad", (65.0, 85.0), LIGHT, 0.4, &[
        (Kick, "x.........x....."),
        (Snare, "....X..o....X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x.......")
    ]),
];

const REGGAE: [Groove; 12] = [
    groove(1, "One Drop", (65.0, 85.0), LIGHT, 0.45, &[
        (Kick, "........x......."),
        (Snare, "........r......."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(2, "Rockers", (70.0, 90.0), LIGHT, 0.55, &[
        (Kick, "x...x...x...x..."),
        (Snare, "........X......."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(3, "Steppers", (70.0, 90.0), STRAIGHT, 0.6, &[
        (Kick, "x...x...x...x..."),
        (Snare, "....x.......x..."),
        (ClosedHat, "..x...x...x...x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(4, "Ska", (140.0, 180.0), STRAIGHT, 0.75, &[
        (Kick, "x.......x......."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(5, "Rocksteady", (75.0, 95.0), LIGHT, 0.5, &[
        (Kick, "x.......x......."),
        (Snare, "....x.......x..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(6, "Dub", (60.0, 80.0), LIGHT, 0.4, &[
        (Kick, "........x......."),
        (Snare, "........r......."),
        (OpenHat, "......x.......x."),
        (Piano, "..x.......x.....")
    ]),
    groove(7, "Dancehall", (90.0, 105.0), STRAIGHT, 0.7, &[
        (Kick, "x..x..x.x..x..x."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "...x..x....x..x.")
    ]),
    groove(8, "Roots", (65.0, 80.0), LIGHT, 0.45, &[
        (Kick, "........x......."),
        (Snare, "........X......."),
        (ClosedHat, "x.xxx.xxx.xxx.xx"),
        (Piano, "..x...x...x...x."),
    ]),
    groove(9, "Lovers Rock", (70.0, 85.0), LIGHT, 0.35, &[
        (Kick, "x.......x......."),
        (Snare, "........r......."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(10, "Reggae Rock", (90.0, 115.0), STRAIGHT, 0.65, &[
        (Kick, "x.......x.x....."),
        (Snare, "....X.......X..."),
        (OpenHat, "..x...x...x...x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(11, "Nyabinghi", (60.0, 80.0), STRAIGHT, 0.35, &[
        (Kick, "x.......x......."),
        (Tom, "h...h.l.h...h.l."),
        (Piano, "x.......x.......")
    ]),
    groove(12, "Ragga", (90.0, 110.0), STRAIGHT, 0.75, &[
        (Kick, "x..x....x..x...."),
        (Clap, "...x..x....x..x."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "...x..x....x..x.")
    ]),
];

const COUNTRY: [Groove; 12] = [
    groove(1, "Train Beat", (100.0, 140.0), STRAIGHT, 0.65, &[
        (Kick, "x.......x......."),
        (Snare, "oxoXoxoXoxoXoxoX"),
        (Piano, "x...x...x...x..."),
    ]),
    groove(2, "Two-Step", (90.0, 130.0), STRAIGHT, 0.55, &[
        (Kick, "x.......x......."),
        (Snare, "....x.......x..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "....x.......x..."),
    ]),
    groove(3, "Country Shuffle", (90.0, 120.0), SHUFFLE, 0.55, &[
        (Kick, "x.......x......."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(4, "Country Waltz", (90.0, 140.0), STRAIGHT, 0.4, &[
        (Kick, "x..........."),
        (Snare, "....r...r..."),
        (ClosedHat, "x...x...x..."),
        (Piano, "....x...x..."),
    ])
    .in_meter(THREE_FOUR),
    groove(5, "Bluegrass", (150.0, 200.0), STRAIGHT, 0.7, &[
        (Kick, "x.......x......."),
        (Snare, "....x.......x..."),
        (Piano, "x...x...x...x..."),
    ]),
    groove(6, "Country Rock", (110.0, 140.0), STRAIGHT, 0.75, &[
        (Kick, "x.....x.x......."),
        (Snare, "....X.......X..."),
        (OpenHat, "x...x...x...x..."),
        (Piano, "x.....x.x.......")
    ]),
    groove(7, "Honky-Tonk", (110.0, 150.0), SHUFFLE, 0.65, &[
        (Kick, "x.......x......."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(8, "Country Ballad", (60.0, 80.0), STRAIGHT, 0.3, &[
        (Kick, "x.......x......."),
        (Snare, "....r.......r..."),
        (Ride, "x...x...x...x..."),
        (Piano, "x.......x.......")
    ]),
    groove(9, "Outlaw", (85.0, 115.0), LIGHT, 0.6, &[
        (Kick, "x.....x.x......."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x...x...x...x..."),
    ]),
    groove(10, "Western Swing", (140.0, 190.0), SHUFFLE, 0.6, &[
        (Kick, "x...x...x...x..."),
        (Snare, "....x.......x..."),
        (Ride, "x...x.x.x...x.x."),
        (Piano, "....x.......x..."),
    ]),
    groove(11, "Cajun", (120.0, 160.0), LIGHT, 0.65, &[
        (Kick, "x...x...x...x..."),
        (Snare, "..x...x...x...x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(12, "Modern Country", (90.0, 120.0), STRAIGHT, 0.7, &[
        (Kick, "x.....x...x....."),
        (Snare, "....X.......X..."),
        (Clap, "....x.......x..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.....x...x.....")
    ]),
];

const LATIN: [Groove; 12] = [
    groove(1, "Salsa", (160.0, 210.0), STRAIGHT, 0.75, &[
        (Kick, "...x.......x...."),
        (Snare, "r..r...r..r.r..."),
        (Ride, "x.xxx.xxx.xxx.xx"),
        (Tom, "......l.......l."),
        (Piano, "x..x..x...x..x.."),
    ]),
    groove(2, "Samba", (180.0, 220.0), STRAIGHT, 0.8, &[
        (Kick, "x..xx..xx..xx..x"),
        (Snare, "o.xoo.xoo.xoo.xo"),
        (ClosedHat, "xxxxxxxxxxxxxxxx"),
        (Piano, "x..x..x...x..x.."),
    ]),
    groove(3, "Bossa", (110.0, 140.0), STRAIGHT, 0.4, &[
        (Kick, "x..xx..xx..xx..x"),
        (Snare, "r..r..r...r..r.."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x..x..x...x.x..."),
    ]),
    groove(4, "Cha-Cha", (110.0, 130.0), STRAIGHT, 0.55, &[
        (Kick, "x.......x......."),
        (Snare, "............x.x."),
        (ClosedHat, "x...x...x...x..."),
        (Tom, "....h.......h.h."),
        (Piano, "x...x...x...x.x."),
    ]),
    groove(5, "Mambo", (170.0, 200.0), STRAIGHT, 0.8, &[
        (Kick, "...x.......x...."),
        (Snare, "..r..r.r..r..r.."),
        (Ride, "x.x.x.x.x.x.x.x."),
        (Piano, "x..x..x.x..x..x."),
    ]),
    groove(6, "Rumba", (90.0, 120.0), STRAIGHT, 0.5, &[
        (Kick, "x.......x......."),
        (Snare, "r..r...r..r...r."),
        (Tom, "......ll......ll"),
        (Piano, "x..x....x..x....")
    ]),
    groove(7, "Merengue", (130.0, 160.0), STRAIGHT, 0.8, &[
        (Kick, "x...x...x...x..."),
        (Snare, "x.xxx.xxx.xxx.xx"),
        (Tom, "..........l.l..."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(8, "Cumbia", (85.0, 110.0), STRAIGHT, 0.6, &[
        (Kick, "x.......x......."),
        (Snare, "....r.......r..."),
        (ClosedHat, "..x...x...x...x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(9, "Tango", (110.0, 130.0), STRAIGHT, 0.6, &[
        (Kick, "x...x...x...x..."),
        (Snare, "............x.x."),
        (Piano, "x...x...x...x..."),
    ]),
    groove(10, "Songo", (110.0, 140.0), STRAIGHT, 0.7, &[
        (Kick, "...x..x....x..x."),
        (Snare, "..x.o..x.o..x.o."),
        (Ride, "x.x.x.x.x.x.x.x."),
        (Piano, "x..x..x...x..x.."),
    ]),
    groove(11, "Bolero", (70.0, 100.0), STRAIGHT, 0.35, &[
        (Kick, "x.......x......."),
        (Snare, "r.....r.r.r....."),
        (Piano, "x.......x.......")
    ]),
    groove(12, "Latin Jazz 6/8", (100.0, 140.0), STRAIGHT, 0.6, &[
        (Kick, "x.....x....."),
        (Ride, "x.x.xx.x.x.x"),
        (Snare, "...r.....r.."),
        (Piano, "x.....x....."),
    ])
    .in_meter(SIX_EIGHT),
];

const METAL: [Groove; 12] = [
    groove(1, "Heavy Metal", (100.0, 140.0), STRAIGHT, 0.85, &[
        (Kick, "x.x...x.x.x...x."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x.......")
    ]),
    groove(2, "Thrash", (160.0, 220.0), STRAIGHT, 1.0, &[
        (Kick, "x.x.x.x.x.x.x.x."),
        (Snare, "..X...X...X...X."),
        (Crash, "x...x...x...x..."),
        (Piano, "x.......x.......")
    ]),
    groove(3, "Double Bass", (140.0, 190.0), STRAIGHT, 1.0, &[
        (Kick, "xxxxxxxxxxxxxxxx"),
        (Snare, "....X.......X..."),
        (Ride, "x...x...x...x..."),
        (Piano, "x.......x.......")
    ]),
    groove(4, "Doom", (50.0, 75.0), STRAIGHT, 0.7, &[
        (Kick, "x.......x.x....."),
        (Snare, "........X......."),
        (Crash, "x..............."),
        (Piano, "x...............")
    ]),
    groove(5, "Metal Gallop", (120.0, 170.0), STRAIGHT, 0.9, &[
        (Kick, "x.xxx.xxx.xxx.xx"),
        (Snare, "....X.......X..."),
        (ClosedHat, "x...x...x...x..."),
        (Piano, "x.......x.......")
    ]),
    groove(6, "Blast Beat", (180.0, 240.0), STRAIGHT, 1.0, &[
        (Kick, "x.x.x.x.x.x.x.x."),
        (Snare, ".x.x.x.x.x.x.x.x"),
        (Ride, "x.x.x.x.x.x.x.x."),
        (Piano, "x...............")
    ]),
    groove(7, "Groove Metal", (90.0, 120.0), STRAIGHT, 0.85, &[
        (Kick, "xx....xx.x..x..."),
        (Snare, "....X.......X..."),
        (OpenHat, "x...x...x...x..."),
        (Piano, "x.....x.........")
    ]),
    groove(8, "Metal Half-Time", (70.0, 100.0), STRAIGHT, 0.8, &[
        (Kick, "x.xx..x.x.xx..x."),
        (Snare, "........X......."),
        (Crash, "x.......x......."),
        (Piano, "x.......x.......")
    ]),
    groove(9, "Power Metal", (160.0, 200.0), STRAIGHT, 0.95, &[
        (Kick, "xxxxxxxxxxxxxxxx"),
        (Snare, "....X.......X..."),
        (Crash, "x.......x......."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(10, "Metal Shuffle", (100.0, 140.0), SHUFFLE, 0.85, &[
        (Kick, "x.x.x.x.x.x.x.x."),
        (Snare, "....X.......X..."),
        (Ride, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x.......")
    ]),
    groove(11, "Djent", (90.0, 130.0), STRAIGHT, 0.9, &[
        (Kick, "x..x.x..x..x.x.."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x...x...x...x..."),
        (Piano, "x..x.x..x..x.x..")
    ]),
    groove(12, "Metal Ballad", (60.0, 85.0), STRAIGHT, 0.5, &[
        (Kick, "x.....x....."),
        (Snare, "......X....."),
        (Ride, "x..x..x..x.."),
        (Piano, "x..x..x..x.."),
    ])
    .in_meter(TWELVE_EIGHT),
];

const HIPHOP: [Groove; 12] = [
    groove(1, "Boom Bap", (85.0, 95.0), LIGHT, 0.65, &[
        (Kick, "x.....x..x......"),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.........x.....")
    ]),
    groove(2, "Trap", (130.0, 160.0), STRAIGHT, 0.75, &[
        (Kick, "x.....x...x....."),
        (Clap, "........X......."),
        (ClosedHat, "x.x.x.xxx.x.x.xx"),
        (Piano, "x.......x.......")
    ]),
    groove(3, "Old School", (95.0, 110.0), STRAIGHT, 0.7, &[
        (Kick, "x...x.x...x....."),
        (Clap, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x.......")
    ]),
    groove(4, "Lo-Fi", (70.0, 90.0), SHUFFLE, 0.4, &[
        (Kick, "x......x..x....."),
        (Snare, "....x.......x..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x.......")
    ]),
    groove(5, "G-Funk", (88.0, 100.0), LIGHT, 0.6, &[
        (Kick, "x..x..x...x....."),
        (Clap, "....X.......X..."),
        (ClosedHat, "xxxxxxxxxxxxxxxx"),
        (Piano, "..x...x...x...x."),
    ]),
    groove(6, "Drill", (135.0, 150.0), STRAIGHT, 0.8, &[
        (Kick, "x.....x.......x."),
        (Snare, "......X.......X."),
        (ClosedHat, "x..x..x.x..x..x."),
        (Piano, "x.......x.......")
    ]),
    groove(7, "Jazz Rap", (85.0, 98.0), SHUFFLE, 0.5, &[
        (Kick, "x.......x.x....."),
        (Snare, "....X.......X..."),
        (Ride, "x.x.x.x.x.x.x.x."),
        (Piano, "......x.......x."),
    ]),
    groove(8, "Crunk", (70.0, 80.0), STRAIGHT, 0.9, &[
        (Kick, "x.x.....x.x....."),
        (Clap, "....X.......X..."),
        (OpenHat, "..x...x...x...x."),
        (Piano, "x...x...x...x..."),
    ]),
    groove(9, "Bounce", (95.0, 105.0), STRAIGHT, 0.85, &[
        (Kick, "x..x..x.x..x..x."),
        (Clap, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x..x..x.........")
    ]),
    groove(10, "Dilla Swing", (82.0, 92.0), HARD, 0.55, &[
        (Kick, "x......x.x......"),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.....x.........")
    ]),
    groove(11, "West Coast", (90.0, 100.0), STRAIGHT, 0.65, &[
        (Kick, "x.....x...x..x.."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "..x.......x.....")
    ]),
    groove(12, "Hip-Hop Ballad", (65.0, 80.0), LIGHT, 0.35, &[
        (Kick, "x.........x....."),
        (Snare, "........X......."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x.......")
    ]),
];

const RNB: [Groove; 12] = [
    groove(1, "Classic Soul", (90.0, 115.0), STRAIGHT, 0.6, &[
        (Kick, "x.....x...x....."),
        (Snare, "....X.......X..."),
        (Clap, "....x.......x..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.x...x.x.x...x.")
    ]),
    groove(2, "Motown", (110.0, 130.0), STRAIGHT, 0.7, &[
        (Kick, "x.x.x.x.x.x.x.x."),
        (Snare, "....X.......X..."),
        (Clap, "....x.......x..."),
        (Piano, "x...x...x...x..."),
    ]),
    groove(3, "Neo Soul", (70.0, 90.0), SHUFFLE, 0.45, &[
        (Kick, "x......x..x....."),
        (Snare, "....X..o....X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.....x...x.....")
    ]),
    groove(4, "Slow Jam", (60.0, 75.0), STRAIGHT, 0.35, &[
        (Kick, "x.........x....."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x.......")
    ]),
    groove(5, "New Jack Swing", (100.0, 115.0), SHUFFLE, 0.75, &[
        (Kick, "x..x..x...x..x.."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x..x......x.....")
    ]),
    groove(6, "Soul Ballad", (55.0, 75.0), STRAIGHT, 0.3, &[
        (Kick, "x.....x....."),
        (Snare, "...X.....X.."),
        (Ride, "x.xx.xx.xx.x"),
        (Piano, "x..x..x..x.."),
    ])
    .in_meter(TWELVE_EIGHT),
    groove(7, "Gospel", (70.0, 100.0), SHUFFLE, 0.6, &[
        (Kick, "x.....x.x......."),
        (Snare, "....X.......X..."),
        (Clap, "....x.......x..."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(8, "Contemporary R&B", (85.0, 100.0), STRAIGHT, 0.55, &[
        (Kick, "x..x......x..x.."),
        (Clap, "....X.......X..."),
        (ClosedHat, "x.xxx.x.x.xxx.x."),
        (Piano, "x.........x.....")
    ]),
    groove(9, "Philly Soul", (100.0, 120.0), STRAIGHT, 0.65, &[
        (Kick, "x...x...x...x..."),
        (Snare, "....X.......X..."),
        (OpenHat, "..x...x...x...x."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(10, "Memphis Soul", (95.0, 115.0), LIGHT, 0.6, &[
        (Kick, "x......xx......."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(11, "Quiet Storm", (65.0, 80.0), LIGHT, 0.3, &[
        (Kick, "x.......x......."),
        (Snare, "....r.......r..."),
        (Ride, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x.......")
    ]),
    groove(12, "Funk Soul", (100.0, 118.0), STRAIGHT, 0.75, &[
        (Kick, "x.x...x...x....."),
        (Snare, "....X..o.o..X..."),
        (ClosedHat, "xxxxxxxxxxxxxxxx"),
        (Piano, "..x..x....x..x..")
    ]),
];

const ELECTRONIC: [Groove; 12] = [
    groove(1, "House", (118.0, 128.0), STRAIGHT, 0.75, &[
        (Kick, "x...x...x...x..."),
        (Clap, "....X.......X..."),
        (OpenHat, "..x...x...x...x."),
        (Piano, "..x...x...x...x."),
    ]),
    groove(2, "Techno", (125.0, 140.0), STRAIGHT, 0.85, &[
        (Kick, "x...x...x...x..."),
        (Clap, "....x.......x..."),
        (ClosedHat, "xxxxxxxxxxxxxxxx"),
        (Piano, "x.......x.......")
    ]),
    groove(3, "Drum and Bass", (160.0, 180.0), STRAIGHT, 0.9, &[
        (Kick, "x.........x....."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x.......")
    ]),
    groove(4, "Breakbeat", (125.0, 140.0), STRAIGHT, 0.8, &[
        (Kick, "x.x.......x....."),
        (Snare, "....X..o.o..X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.....x.........")
    ]),
    groove(5, "Dubstep", (138.0, 142.0), STRAIGHT, 0.85, &[
        (Kick, "x.........x....."),
        (Snare, "........X......."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x...............")
    ]),
    groove(6, "Electro", (120.0, 135.0), STRAIGHT, 0.75, &[
        (Kick, "x.....x...x....."),
        (Clap, "....X.......X..."),
        (ClosedHat, "x.xxx.xxx.xxx.xx"),
        (Piano, "x..x..x.........")
    ]),
    groove(7, "Garage Two-Step", (128.0, 138.0), LIGHT, 0.7, &[
        (Kick, "x......x..x....."),
        (Snare, "....X.......X..."),
        (ClosedHat, "..x...x...x...x."),
        (Piano, "...x......x.....")
    ]),
    groove(8, "Trance", (130.0, 145.0), STRAIGHT, 0.8, &[
        (Kick, "x...x...x...x..."),
        (Clap, "....x.......x..."),
        (OpenHat, "..x...x...x...x."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(9, "Synthwave", (80.0, 118.0), STRAIGHT, 0.6, &[
        (Kick, "x.......x......."),
        (Snare, "....X.......X..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.x.x.x.x.x.x.x."),
    ]),
    groove(10, "Downtempo", (80.0, 100.0), LIGHT, 0.4, &[
        (Kick, "x......x..x....."),
        (Snare, "....x.......x..."),
        (ClosedHat, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x.......")
    ]),
    groove(11, "Deep House", (118.0, 124.0), LIGHT, 0.55, &[
        (Kick, "x...x...x...x..."),
        (Clap, "....x.......x..."),
        (ClosedHat, "..x...x...x...x."),
        (Piano, "...x......x.....")
    ]),
    groove(12, "Jungle", (160.0, 175.0), STRAIGHT, 0.9, &[
        (Kick, "x.........x....."),
        (Snare, "....X..o.o..X..o"),
        (Ride, "x.x.x.x.x.x.x.x."),
        (Piano, "x.......x.......")
    ]),
];

const GENRES: [(&str, &[Groove; 12]); 12] = [
    ("rock", &ROCK),
    ("pop", &POP),
    ("blues", &BLUES),
    ("jazz", &JAZZ),
    ("funk", &FUNK),
    ("reggae", &REGGAE),
    ("country", &COUNTRY),
    ("latin", &LATIN),
    ("metal", &METAL),
    ("hiphop", &HIPHOP),
    ("rnb", &RNB),
    ("electronic", &ELECTRONIC),
];

impl StyleLibrary {
    /// The reference content: 12 genres × 12 styles, with ("rock", 1)
    /// "Straight Rock" as the fallback.
    ///
    /// A descriptor that fails validation is logged and left out rather than
    /// taking the rest of the table down with it.
    pub fn reference() -> Result<Self> {
        let mut styles = Vec::with_capacity(144);
        for (genre, grooves) in GENRES {
            for groove in grooves.iter() {
                match groove.pattern() {
                    Ok(pattern) => styles.push(Style::new(
                        StyleKey::new(genre, groove.id),
                        groove.name,
                        pattern,
                    )),
                    Err(err) => error!(genre, style = groove.id, %err, "invalid groove"),
                }
            }
        }
        StyleLibrary::new(
            styles,
            StyleKey::new(Self::FALLBACK_GENRE, Self::FALLBACK_STYLE),
        )
    }
}
