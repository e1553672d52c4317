use serde::{Deserialize, Serialize};

use courier_api::{PublishError, Record, RecordSource};

// ═══════════════════════════════════════════════════════════════
//  Employee
// ═══════════════════════════════════════════════════════════════

/// Схема, встраиваемая в каждый публикуемый контейнер — потребители
/// декодируют payload'ы без entity-классов и артефактов схемы.
pub const EMPLOYEE_SCHEMA: &str = r#"
{
    "type": "record",
    "name": "Employee",
    "namespace": "dev.courier.demo",
    "fields": [
        {"name": "name", "type": "string"},
        {"name": "id", "type": "long"}
    ]
}"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub name: String,
    pub id: i64,
}

impl Employee {
    pub fn to_record(&self) -> Result<Record, PublishError> {
        Ok(Record::new(self.name.clone(), serde_json::to_value(self)?))
    }
}

const NAMES: &[&str] = &[
    "Alice", "Bob", "Carol", "Dave", "Erin", "Frank", "Grace", "Heidi", "Ivan", "Judy", "Mallory",
    "Niaj", "Olivia", "Peggy", "Rupert", "Sybil", "Trent", "Victor", "Walter", "Wendy",
];

// ═══════════════════════════════════════════════════════════════
//  RNG (xorshift64)
// ═══════════════════════════════════════════════════════════════

pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: i64) -> Self {
        let state = if seed == 0 {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos() as u64
                | 1 // ensure non-zero
        } else {
            seed as u64
        };
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    pub fn next_intn(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

// ═══════════════════════════════════════════════════════════════
//  Random employee source
// ═══════════════════════════════════════════════════════════════

/// Генерирует `count` случайных сотрудников: имена из фиксированного
/// списка, последовательные id начиная с 1.
pub struct RandomEmployeeSource {
    remaining: u64,
    next_id: i64,
    rng: Rng,
}

impl RandomEmployeeSource {
    pub fn new(count: u64, seed: i64) -> Self {
        Self {
            remaining: count,
            next_id: 1,
            rng: Rng::new(seed),
        }
    }
}

impl RecordSource for RandomEmployeeSource {
    fn next_record(&mut self) -> Result<Option<Record>, PublishError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;

        let employee = Employee {
            name: NAMES[self.rng.next_intn(NAMES.len())].to_string(),
            id: self.next_id,
        };
        self.next_id += 1;
        employee.to_record().map(Some)
    }

    fn size_hint(&self) -> Option<u64> {
        Some(self.remaining)
    }
}
