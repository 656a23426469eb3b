//! C++ runtime prepended to every generated program.
//!
//! `Vec` values are carved out of a single bump `Arena` owned by `main`.
//! Element-wise operations assume both operands have the same length;
//! the result takes the length of the left (or only) vector operand.

/// Runtime function names, as called by generated code.
pub const VEC_ADD: &str = "vec_add";
pub const VEC_SUB: &str = "vec_sub";
pub const VEC_MUL: &str = "vec_mul";
pub const VEC_DIV: &str = "vec_div";
pub const VEC_SCALAR_ADD: &str = "vec_scalar_add";
pub const VEC_SCALAR_MUL: &str = "vec_scalar_mul";
pub const PRINT_VEC: &str = "print_vec";

/// Every routine the runtime defines.
pub const FUNCTIONS: &[&str] = &[
    VEC_ADD,
    VEC_SUB,
    VEC_MUL,
    VEC_DIV,
    VEC_SCALAR_ADD,
    VEC_SCALAR_MUL,
    PRINT_VEC,
];

pub const PRELUDE: &str = r#"#include <iostream>
#include <vector>
#include <cstring>

// Arena allocator
class Arena {
public:
    Arena(size_t size) : size(size), offset(0) {
        buffer = new char[size];
    }
    ~Arena() { delete[] buffer; }
    void* allocate(size_t n) {
        if (offset + n > size) throw std::bad_alloc();
        void* ptr = buffer + offset;
        offset += n;
        return ptr;
    }
private:
    char* buffer;
    size_t size;
    size_t offset;
};

// Vector type
struct Vec {
    float* data;
    size_t size;
    Vec(Arena& arena, size_t s) : size(s) {
        data = (float*)arena.allocate(s * sizeof(float));
    }
    float& operator[](size_t i) { return data[i]; }
};

Vec vec_add(Arena& arena, const Vec& a, const Vec& b) {
    Vec result(arena, a.size);
    for (size_t i = 0; i < a.size; i++)
        result[i] = a.data[i] + b.data[i];
    return result;
}

Vec vec_sub(Arena& arena, const Vec& a, const Vec& b) {
    Vec result(arena, a.size);
    for (size_t i = 0; i < a.size; i++)
        result[i] = a.data[i] - b.data[i];
    return result;
}

Vec vec_mul(Arena& arena, const Vec& a, const Vec& b) {
    Vec result(arena, a.size);
    for (size_t i = 0; i < a.size; i++)
        result[i] = a.data[i] * b.data[i];
    return result;
}

Vec vec_div(Arena& arena, const Vec& a, const Vec& b) {
    Vec result(arena, a.size);
    for (size_t i = 0; i < a.size; i++)
        result[i] = a.data[i] / b.data[i];
    return result;
}

Vec vec_scalar_add(Arena& arena, const Vec& v, float s) {
    Vec result(arena, v.size);
    for (size_t i = 0; i < v.size; i++)
        result[i] = v.data[i] + s;
    return result;
}

Vec vec_scalar_mul(Arena& arena, const Vec& v, float s) {
    Vec result(arena, v.size);
    for (size_t i = 0; i < v.size; i++)
        result[i] = v.data[i] * s;
    return result;
}

void print_vec(const Vec& v) {
    std::cout << "[";
    for (size_t i = 0; i < v.size; i++) {
        std::cout << v.data[i];
        if (i < v.size - 1) std::cout << ", ";
    }
    std::cout << "]" << std::endl;
}
"#;
