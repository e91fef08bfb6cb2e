//! Target-text supply. The engines treat category ids as opaque strings;
//! only this module knows what lives behind them.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::engine::scoring::Difficulty;

/// One text a player will type, with attribution for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Passage {
    pub text: String,
    pub source: String,
}

/// Supplies the immutable target text for a turn.
pub trait TextProvider {
    fn get_text(&mut self, category: &str, difficulty: Difficulty) -> Passage;
}

pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub unlock_level: u32,
    pub description: &'static str,
}

pub const CATEGORIES: &[Category] = &[
    Category {
        id: "classics",
        name: "Literary Classics",
        unlock_level: 1,
        description: "Famous works of literature",
    },
    Category {
        id: "poetry",
        name: "Poetry",
        unlock_level: 3,
        description: "Classic poems and verses",
    },
    Category {
        id: "code",
        name: "Code",
        unlock_level: 5,
        description: "Famous algorithms and snippets",
    },
    Category {
        id: "random",
        name: "Random Words",
        unlock_level: 8,
        description: "Random word combinations",
    },
    Category {
        id: "humor",
        name: "Humor",
        unlock_level: 12,
        description: "Funny phrases and tongue twisters",
    },
    Category {
        id: "modern",
        name: "Modern",
        unlock_level: 15,
        description: "Contemporary prose",
    },
];

pub fn category_by_id(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.id == id)
}

type Entry = (&'static str, &'static str);

struct Shelf {
    easy: &'static [Entry],
    medium: &'static [Entry],
    hard: &'static [Entry],
    expert: &'static [Entry],
}

impl Shelf {
    // Tiers without curated entries fall back to easy.
    fn entries(&self, difficulty: Difficulty) -> &'static [Entry] {
        let picked = match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Expert => self.expert,
        };
        if picked.is_empty() { self.easy } else { picked }
    }
}

const CLASSICS: Shelf = Shelf {
    easy: &[
        (
            "It was a bright cold day in April, and the clocks were striking thirteen.",
            "1984 - George Orwell",
        ),
        (
            "All happy families are alike; each unhappy family is unhappy in its own way.",
            "Anna Karenina - Leo Tolstoy",
        ),
        (
            "It was the best of times, it was the worst of times, it was the age of wisdom, it was the age of foolishness.",
            "A Tale of Two Cities - Charles Dickens",
        ),
    ],
    medium: &[
        (
            "Two households, both alike in dignity, in fair Verona, where we lay our scene, from ancient grudge break to new mutiny, where civil blood makes civil hands unclean.",
            "Romeo and Juliet - William Shakespeare",
        ),
        (
            "Whether I shall turn out to be the hero of my own life, or whether that station will be held by anybody else, these pages must show.",
            "David Copperfield - Charles Dickens",
        ),
    ],
    hard: &[(
        "You don't know about me without you have read a book by the name of The Adventures of Tom Sawyer; but that ain't no matter. That book was made by Mr. Mark Twain, and he told the truth, mainly.",
        "Adventures of Huckleberry Finn - Mark Twain",
    )],
    expert: &[(
        "In the late summer of that year we lived in a house in a village that looked across the river and the plain to the mountains. In the bed of the river there were pebbles and boulders, dry and white in the sun, and the water was clear and swiftly moving and blue in the channels.",
        "A Farewell to Arms - Ernest Hemingway",
    )],
};

const POETRY: Shelf = Shelf {
    easy: &[
        (
            "Two roads diverged in a yellow wood, and sorry I could not travel both and be one traveler, long I stood.",
            "The Road Not Taken - Robert Frost",
        ),
        (
            "Do not go gentle into that good night. Rage, rage against the dying of the light.",
            "Do Not Go Gentle - Dylan Thomas",
        ),
    ],
    medium: &[(
        "If you can keep your head when all about you are losing theirs and blaming it on you, if you can trust yourself when all men doubt you, but make allowance for their doubting too.",
        "If - Rudyard Kipling",
    )],
    hard: &[(
        "Once upon a midnight dreary, while I pondered, weak and weary, over many a quaint and curious volume of forgotten lore, while I nodded, nearly napping, suddenly there came a tapping, as of someone gently rapping, rapping at my chamber door.",
        "The Raven - Edgar Allan Poe",
    )],
    expert: &[(
        "I met a traveller from an antique land, who said: Two vast and trunkless legs of stone stand in the desert. Near them, on the sand, half sunk a shattered visage lies, whose frown, and wrinkled lip, and sneer of cold command, tell that its sculptor well those passions read which yet survive.",
        "Ozymandias - Percy Bysshe Shelley",
    )],
};

const CODE: Shelf = Shelf {
    easy: &[
        (
            "for i in range(10): print(i)",
            "Loop - Python",
        ),
        (
            "const sum = (a, b) => a + b; console.log(sum(2, 3));",
            "Arrow Function - JavaScript",
        ),
    ],
    medium: &[(
        "def fibonacci(n): if n <= 1: return n; return fibonacci(n-1) + fibonacci(n-2)",
        "Fibonacci - Python",
    )],
    hard: &[(
        "function quickSort(arr) { if (arr.length <= 1) return arr; const pivot = arr[Math.floor(arr.length / 2)]; const left = arr.filter(x => x < pivot); const middle = arr.filter(x => x === pivot); const right = arr.filter(x => x > pivot); return [...quickSort(left), ...middle, ...quickSort(right)]; }",
        "QuickSort - JavaScript",
    )],
    expert: &[(
        "const debounce = (fn, delay) => { let timeoutId; return (...args) => { clearTimeout(timeoutId); timeoutId = setTimeout(() => fn.apply(this, args), delay); }; };",
        "Debounce Pattern - JavaScript",
    )],
};

const HUMOR: Shelf = Shelf {
    easy: &[
        (
            "Why don't scientists trust atoms? Because they make up everything!",
            "Classic joke",
        ),
        (
            "I'm reading a book about anti-gravity. It's impossible to put down!",
            "Classic joke",
        ),
    ],
    medium: &[(
        "She sells seashells by the seashore. The shells she sells are seashells, I'm sure.",
        "Tongue Twister",
    )],
    hard: &[(
        "I'm not saying I'm Batman, I'm just saying no one has ever seen me and Batman in the same room together. Make of that what you will.",
        "Internet humor",
    )],
    expert: &[(
        "Buffalo buffalo Buffalo buffalo buffalo buffalo Buffalo buffalo. This is a grammatically correct sentence using buffalo as noun, verb, and proper noun simultaneously.",
        "Linguistic oddity",
    )],
};

const MODERN: Shelf = Shelf {
    easy: &[(
        "The internet has revolutionized how we communicate, work, and procrastinate.",
        "Tech blog",
    )],
    medium: &[(
        "The gig economy has fundamentally altered traditional employment relationships, offering flexibility while raising questions about worker protections and benefits.",
        "Business article",
    )],
    hard: &[(
        "Quantum computing represents a paradigm shift in computational capability, leveraging quantum mechanical phenomena such as superposition and entanglement to process information in ways classical computers cannot match.",
        "Science article",
    )],
    expert: &[],
};

fn shelf(category: &str) -> Option<&'static Shelf> {
    match category {
        "classics" => Some(&CLASSICS),
        "poetry" => Some(&POETRY),
        "code" => Some(&CODE),
        "humor" => Some(&HUMOR),
        "modern" => Some(&MODERN),
        _ => None,
    }
}

const COMMON_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "it", "for", "not", "on", "with",
    "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we", "say", "her",
    "she", "or", "an", "will", "my", "one", "all", "would", "there", "their", "what", "so", "up",
    "out", "if", "about", "who", "get", "which", "go", "me", "when", "make", "can", "like", "time",
    "people", "into", "year", "your", "good", "some",
];

/// Built-in passage library. The `random` category and any unknown id fall
/// back to generated common-word sequences sized by the difficulty tier.
pub struct BuiltinLibrary {
    rng: SmallRng,
}

impl BuiltinLibrary {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn random_words(&mut self, count: usize) -> Passage {
        let words: Vec<&str> = (0..count)
            .map(|_| COMMON_WORDS[self.rng.gen_range(0..COMMON_WORDS.len())])
            .collect();
        Passage {
            text: words.join(" "),
            source: "Random words".to_string(),
        }
    }
}

impl Default for BuiltinLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProvider for BuiltinLibrary {
    fn get_text(&mut self, category: &str, difficulty: Difficulty) -> Passage {
        let Some(shelf) = shelf(category) else {
            let (low, _high) = difficulty.word_range();
            return self.random_words(low);
        };
        let entries = shelf.entries(difficulty);
        let (text, source) = entries[self.rng.gen_range(0..entries.len())];
        Passage {
            text: text.to_string(),
            source: source.to_string(),
        }
    }
}
